//! Pot Logic Engine — N-API Bindings
//!
//! Exposes the engine to the Node.js web layer. Requests and responses
//! cross the FFI boundary as plain JS objects; napi's serde-json support
//! marshals them to `serde_json::Value`, and serde maps those onto the
//! engine's request/response types.
//!
//! Engine errors become JS exceptions: input problems as `InvalidArg`,
//! deck exhaustion as `GenericFailure`.

use napi::bindgen_prelude::*;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api;
use crate::error::EngineError;

fn to_napi(err: EngineError) -> Error {
    let status = if err.is_invalid_input() {
        Status::InvalidArg
    } else {
        Status::GenericFailure
    };
    Error::new(status, err.to_string())
}

fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::new(Status::InvalidArg, format!("malformed request: {e}")))
}

fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| Error::new(Status::GenericFailure, e.to_string()))
}

/// Initialize logging. Called once at server startup.
#[napi]
pub fn init() {
    crate::init();
}

/// Return the engine version string.
#[napi]
pub fn version() -> String {
    crate::version()
}

/// `{ player_cards, community_cards? }` → hand evaluation.
#[napi]
pub fn evaluate_hand(request: serde_json::Value) -> Result<serde_json::Value> {
    let request: api::HandRequest = decode(request)?;
    let result = api::evaluate_hand(&request).map_err(to_napi)?;
    encode(&result)
}

/// `{ player_cards, community_cards?, num_players?, num_simulations? }` → probabilities.
#[napi]
pub fn calculate_probabilities(request: serde_json::Value) -> Result<serde_json::Value> {
    let request: api::ProbabilityRequest = decode(request)?;
    let result = api::calculate_probabilities(&request).map_err(to_napi)?;
    encode(&result)
}

/// `{ pot_size, bet_to_call, player_cards?, community_cards?, position?, num_players? }` → odds.
#[napi]
pub fn calculate_pot_odds(request: serde_json::Value) -> Result<serde_json::Value> {
    let request: api::PotOddsRequest = decode(request)?;
    let result = api::calculate_pot_odds(&request).map_err(to_napi)?;
    encode(&result)
}
