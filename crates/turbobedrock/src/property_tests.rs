//! Property-based tests for turbobedrock
//!
//! Invariants of the request pipeline checked over generated identifiers and
//! parameter bags.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::{Map, Value, json};

    use crate::providers::bedrock::{
        StaticModelCatalog, completion_path, is_prompt_resource, normalize_params, stream_path,
    };
    use crate::types::{Capability, ModelInfo};

    // ===== Strategy Generators =====

    fn arb_identifier() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-z]{2,10}\\.[a-z0-9-]{2,30}(:[0-9])?",
            "arn:aws:bedrock:[a-z0-9-]{0,12}:[0-9]{0,12}:prompt/[A-Za-z0-9 +_-]{1,16}",
            "arn:aws:bedrock:[a-z0-9-]{0,12}:[0-9]{0,12}:inference-profile/[a-z0-9.:-]{1,24}",
            "[ -~]{0,40}",
        ]
    }

    fn arb_scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            (0i64..1000).prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
        ]
    }

    fn arb_params() -> impl Strategy<Value = Map<String, Value>> {
        (
            prop::collection::btree_map("[a-zA-Z_]{1,12}", arb_scalar(), 0..5),
            prop::option::of(0i64..500),
            prop::option::of(prop::collection::btree_map("[a-z_]{1,8}", arb_scalar(), 0..3)),
        )
            .prop_map(|(base, top_k, additional)| {
                let mut params: Map<String, Value> = base.into_iter().collect();
                if let Some(top_k) = top_k {
                    params.insert("top_k".to_string(), json!(top_k));
                }
                if let Some(fields) = additional {
                    params.insert(
                        "additionalModelRequestFields".to_string(),
                        Value::Object(fields.into_iter().collect()),
                    );
                }
                params
            })
    }

    fn catalog() -> StaticModelCatalog {
        StaticModelCatalog::new([
            ModelInfo::new("deepseek.r1-v1:0").with_capability(Capability::ReasoningEmbedded),
        ])
    }

    // ===== Classification Properties =====

    proptest! {
        /// Property: classification is exactly the prefix-and-segment rule
        #[test]
        fn prop_prompt_classification(id in arb_identifier()) {
            let expected = id.starts_with("arn:aws:bedrock:") && id.contains(":prompt/");
            prop_assert_eq!(is_prompt_resource(&id), expected);
        }
    }

    // ===== Path Properties =====

    proptest! {
        /// Property: the encoded segment holds only unreserved characters and escapes
        #[test]
        fn prop_path_segment_is_opaque(id in arb_identifier()) {
            let path = completion_path(&id);
            let segment = path
                .strip_prefix("/model/")
                .and_then(|p| p.strip_suffix("/converse"))
                .unwrap();
            prop_assert!(!segment.contains(':'));
            prop_assert!(!segment.contains('/'));
            prop_assert!(!segment.contains(' '));
            prop_assert!(!segment.contains('+'));
            prop_assert!(!segment.contains('*'));
            prop_assert!(segment
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b"-._~%".contains(&b)));
        }

        /// Property: sync and stream paths differ only in the suffix
        #[test]
        fn prop_stream_path_matches_completion_path(id in arb_identifier()) {
            prop_assert_eq!(stream_path(&id), format!("{}-stream", completion_path(&id)));
        }
    }

    // ===== Normalization Properties =====

    proptest! {
        /// Property: normalization is idempotent and never leaves a top-level top_k
        #[test]
        fn prop_normalize_idempotent(
            params in arb_params(),
            reasoning in any::<bool>(),
        ) {
            let model = if reasoning { "deepseek.r1-v1:0" } else { "amazon.nova-pro-v1:0" };
            let catalog = catalog();

            let once = normalize_params(&params, model, &catalog);
            let twice = normalize_params(&once, model, &catalog);

            prop_assert!(!once.contains_key("top_k"));
            prop_assert_eq!(&once, &twice);
        }

        /// Property: top_k reaches additional fields only for reasoning models
        #[test]
        fn prop_top_k_routing(top_k in 1i64..500, reasoning in any::<bool>()) {
            let model = if reasoning { "deepseek.r1-v1:0" } else { "amazon.nova-pro-v1:0" };
            let mut params = Map::new();
            params.insert("top_k".to_string(), json!(top_k));

            let normalized = normalize_params(&params, model, &catalog());
            let promoted = normalized
                .get("additionalModelRequestFields")
                .and_then(|f| f.get("top_k"))
                .cloned();

            if reasoning {
                prop_assert_eq!(promoted, Some(json!(top_k)));
            } else {
                prop_assert!(normalized.is_empty());
            }
        }
    }
}
