use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use binaryex::Error;
use serde_json::{json, Value as Json};

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn read_json(path: &Path) -> Json {
    let data = fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read {:?}: {e}", path));
    serde_json::from_str(&data).unwrap_or_else(|e| panic!("failed to parse {:?}: {e}", path))
}

fn from_hex(hex: &str) -> Vec<u8> {
    assert!(hex.len() % 2 == 0, "hex string must have even length: {hex}");
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or_else(|e| panic!("bad hex {hex}: {e}")))
        .collect()
}

fn encode_case(ty: &str, value: &Json) -> Vec<u8> {
    let out = match ty {
        "bool" => binaryex::to_vec(&value.as_bool().unwrap()),
        "i64" => binaryex::to_vec(&value.as_i64().unwrap()),
        "i32" => binaryex::to_vec(&(value.as_i64().unwrap() as i32)),
        "u64" => binaryex::to_vec(&value.as_u64().unwrap()),
        "u8" => binaryex::to_vec(&(value.as_u64().unwrap() as u8)),
        "f64" => binaryex::to_vec(&value.as_f64().unwrap()),
        "f32" => binaryex::to_vec(&(value.as_f64().unwrap() as f32)),
        "string" => binaryex::to_vec(value.as_str().unwrap()),
        "u8_seq" => {
            let items: Vec<u8> = serde_json::from_value(value.clone()).unwrap();
            binaryex::to_vec(&items)
        }
        "string_seq" => {
            let items: Vec<String> = serde_json::from_value(value.clone()).unwrap();
            binaryex::to_vec(&items)
        }
        "u8_array3" => {
            let items: [u8; 3] = serde_json::from_value(value.clone()).unwrap();
            binaryex::to_vec(&items)
        }
        "option_u32" => {
            let item: Option<u32> = serde_json::from_value(value.clone()).unwrap();
            binaryex::to_vec(&item)
        }
        "u8_string_map" => {
            let map: BTreeMap<u8, String> = serde_json::from_value(value.clone()).unwrap();
            binaryex::to_vec(&map)
        }
        other => panic!("unknown vector type {other}"),
    };
    out.unwrap_or_else(|e| panic!("encode {ty} failed: {e}"))
}

fn decode_case(ty: &str, bytes: &[u8]) -> Result<Json, Error> {
    Ok(match ty {
        "bool" => json!(binaryex::from_slice::<bool>(bytes)?),
        "i64" => json!(binaryex::from_slice::<i64>(bytes)?),
        "i32" => json!(binaryex::from_slice::<i32>(bytes)?),
        "u64" => json!(binaryex::from_slice::<u64>(bytes)?),
        "u8" => json!(binaryex::from_slice::<u8>(bytes)?),
        "f64" => json!(binaryex::from_slice::<f64>(bytes)?),
        "f32" => json!(binaryex::from_slice::<f32>(bytes)?),
        "string" => json!(binaryex::from_slice::<String>(bytes)?),
        "u8_seq" => json!(binaryex::from_slice::<Vec<u8>>(bytes)?),
        "string_seq" => json!(binaryex::from_slice::<Vec<String>>(bytes)?),
        "u8_array3" => json!(binaryex::from_slice::<[u8; 3]>(bytes)?),
        "option_u32" => json!(binaryex::from_slice::<Option<u32>>(bytes)?),
        "u8_string_map" => json!(binaryex::from_slice::<BTreeMap<u8, String>>(bytes)?),
        other => panic!("unknown vector type {other}"),
    })
}

#[test]
fn vectors_encode_to_expected_bytes() {
    let fixture = read_json(&fixtures_dir().join("wire_vectors.json"));
    assert_eq!(fixture["fixture_version"].as_i64(), Some(1));

    for case in fixture["vectors"].as_array().expect("vectors must be array") {
        let name = case["name"].as_str().expect("vector name must be string");
        let ty = case["type"].as_str().expect("vector type must be string");
        let expected = from_hex(case["hex"].as_str().expect("vector hex must be string"));
        assert_eq!(encode_case(ty, &case["value"]), expected, "encode mismatch for {name}");
    }
}

#[test]
fn vectors_decode_to_expected_values() {
    let fixture = read_json(&fixtures_dir().join("wire_vectors.json"));

    for case in fixture["vectors"].as_array().expect("vectors must be array") {
        let name = case["name"].as_str().expect("vector name must be string");
        let ty = case["type"].as_str().expect("vector type must be string");
        let bytes = from_hex(case["hex"].as_str().expect("vector hex must be string"));
        let decoded = decode_case(ty, &bytes).unwrap_or_else(|e| panic!("decode {name} failed: {e}"));

        let expected = match (ty, &case["value"]) {
            // An absent pointer comes back as a present zero value.
            ("option_u32", Json::Null) => json!(0),
            (_, value) => value.clone(),
        };
        assert_eq!(decoded, expected, "decode mismatch for {name}");
    }
}

#[test]
fn malformed_inputs_fail_with_expected_class() {
    let fixture = read_json(&fixtures_dir().join("wire_vectors.json"));

    for case in fixture["malformed"].as_array().expect("malformed must be array") {
        let name = case["name"].as_str().expect("case name must be string");
        let ty = case["type"].as_str().expect("case type must be string");
        let bytes = from_hex(case["hex"].as_str().expect("case hex must be string"));
        let err = match decode_case(ty, &bytes) {
            Ok(value) => panic!("{name} decoded to {value} instead of failing"),
            Err(err) => err,
        };

        match case["error"].as_str().expect("case error must be string") {
            "unexpected" => assert!(err.is_unexpected(), "{name}: expected unexpected-value error, got {err:?}"),
            "io" => assert!(matches!(err, Error::Io(_)), "{name}: expected io error, got {err:?}"),
            other => panic!("unknown error class {other}"),
        }
    }
}
