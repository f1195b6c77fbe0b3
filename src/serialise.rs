//! JSON serialisation of log items.
//!
//! The wire format is one bare JSON document per send: no length prefix,
//! delimiter, or envelope.

use serde::Serialize;

use crate::error::LogError;

/// Serialise `item` into the bytes written to the socket.
pub fn serialise_item<T: Serialize + ?Sized>(item: &T) -> Result<Vec<u8>, LogError> {
    serde_json::to_vec(item).map_err(LogError::Serialise)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rstest::rstest;
    use serde::Serializer;
    use serde_json::json;

    use super::*;

    struct Refuses;

    impl Serialize for Refuses {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refuses to serialise"))
        }
    }

    #[rstest]
    #[case(json!([1, "foo"]), b"[1,\"foo\"]".as_slice())]
    #[case(json!({"k": null}), b"{\"k\":null}".as_slice())]
    #[case(json!("x"), b"\"x\"".as_slice())]
    #[case(json!(42), b"42".as_slice())]
    fn writes_compact_json_without_framing(
        #[case] item: serde_json::Value,
        #[case] expected: &[u8],
    ) {
        assert_eq!(serialise_item(&item).expect("serialise item"), expected);
    }

    #[rstest]
    fn tuples_serialise_as_arrays() {
        assert_eq!(serialise_item(&(1, "foo")).expect("serialise tuple"), b"[1,\"foo\"]");
    }

    #[rstest]
    fn custom_failure_is_reported() {
        let err = serialise_item(&Refuses).expect_err("must fail");
        assert!(matches!(err, LogError::Serialise(_)));
        assert!(err.to_string().contains("refuses to serialise"));
    }

    #[rstest]
    fn non_string_map_keys_are_rejected() {
        let mut map = BTreeMap::new();
        map.insert((1, 2), "pair");
        let err = serialise_item(&map).expect_err("tuple keys are not JSON");
        assert!(matches!(err, LogError::Serialise(_)));
    }
}
