//! Property-based tests for the wire codec (§8 invariants 4 and 5):
//! round-tripping arbitrary requests and values through the line protocol
//! must reproduce the original, including nested array shape.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "tests can panic")]

use proptest::prelude::*;
use ta_driver::{CallbackSignature, Decoder, Encoder, Request, WireValue};

fn wire_value_strategy() -> impl Strategy<Value = WireValue> {
    let leaf = any::<i64>().prop_map(WireValue::Scalar);
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(WireValue::Array)
    })
}

fn callback_signature_strategy() -> impl Strategy<Value = CallbackSignature> {
    ("[a-z][a-z0-9_]{0,8}", 0usize..4)
        .prop_map(|(name, param_count)| CallbackSignature { name, param_count })
}

fn request_strategy() -> impl Strategy<Value = Request> {
    prop_oneof![
        (
            "[a-z][a-z0-9_]{0,8}",
            prop::collection::vec(wire_value_strategy(), 0..4),
            any::<bool>(),
            prop::collection::vec(callback_signature_strategy(), 0..3),
        )
            .prop_map(|(name, args, has_return_value, callbacks)| Request::MethodCall {
                name,
                args,
                has_return_value,
                callbacks,
            }),
        prop::option::of(any::<i64>()).prop_map(|value| Request::CallbackReturn { value }),
        Just(Request::Exit),
    ]
}

fn encode_request(request: &Request) -> Vec<u8> {
    let mut buf = Vec::new();
    Encoder::new(&mut buf).write_request(request).expect("encode should succeed");
    buf
}

fn requests_equal(a: &Request, b: &Request) -> bool {
    match (a, b) {
        (
            Request::MethodCall { name: n1, args: a1, has_return_value: h1, callbacks: c1 },
            Request::MethodCall { name: n2, args: a2, has_return_value: h2, callbacks: c2 },
        ) => {
            n1 == n2
                && a1 == a2
                && h1 == h2
                && c1.len() == c2.len()
                && c1.iter().zip(c2).all(|(x, y)| x.name == y.name && x.param_count == y.param_count)
        }
        (Request::CallbackReturn { value: v1 }, Request::CallbackReturn { value: v2 }) => v1 == v2,
        (Request::Exit, Request::Exit) => true,
        _ => false,
    }
}

proptest! {
    /// Invariant 5: `encode(decode(bytes)) == bytes` for any valid encoded
    /// value, and nested shape survives the round trip.
    #[test]
    fn value_round_trips_through_the_wire(value in wire_value_strategy()) {
        let mut buf = Vec::new();
        Encoder::new(&mut buf).write_value(&value).expect("encode should succeed");
        let decoded = Decoder::new(buf.as_slice()).read_value().expect("decode should succeed");
        prop_assert_eq!(decoded, value);
    }

    /// Invariant 4: serialize-then-deserialize of any `method_call` /
    /// `callback_return` / `exit` request yields the original.
    #[test]
    fn request_round_trips_through_the_wire(request in request_strategy()) {
        let encoded = encode_request(&request);
        let decoded = Decoder::new(encoded.as_slice()).read_request().expect("decode should succeed");
        prop_assert!(requests_equal(&request, &decoded));
    }
}
