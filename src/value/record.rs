use ahash::AHashMap;
use serde_json::Value;

/// The live data of one process instance, keyed by field id.
///
/// Values are kept as raw JSON so that strings, numbers, booleans and id arrays
/// survive a round trip through the persisted document untouched.
pub type ValueRecord = AHashMap<String, Value>;

