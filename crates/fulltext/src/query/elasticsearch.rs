//! Elasticsearch Query DSL rendering.
//!
//! Translates [`TextQuery`] trees and [`IndexRequest`]s into request bodies for an
//! Elasticsearch-backed [`TextIndex`](crate::core::TextIndex), and provides the
//! index mapping with the analyzers the suggestion engine relies on.

use serde_json::{Value, json};

use crate::core::IndexRequest;

use super::{BoolQuery, PhraseQuery, TermValue, TextQuery, fields};

/// Largest page a single search may return; also set as `index.max_result_window`.
pub const MAX_RESULT_WINDOW: usize = 10_000;

/// Renders a query tree as Query DSL.
pub fn to_query_dsl(query: &TextQuery) -> Value {
    match query {
        TextQuery::Bool(b) => bool_clause(b),
        TextQuery::Keyword { field, value } => json!({
            "match": {
                field.as_str(): {
                    "query": value,
                    "operator": "or"
                }
            }
        }),
        TextQuery::Terms { field, values } => terms_clause(field, values),
        TextQuery::Phrase(p) => phrase_clause(p),
    }
}

fn bool_clause(b: &BoolQuery) -> Value {
    let mut bool_query = serde_json::Map::new();

    if !b.must.is_empty() {
        bool_query.insert(
            "must".to_string(),
            Value::Array(b.must.iter().map(to_query_dsl).collect()),
        );
    }

    if !b.should.is_empty() {
        bool_query.insert(
            "should".to_string(),
            Value::Array(b.should.iter().map(to_query_dsl).collect()),
        );
        if b.must.is_empty() {
            bool_query.insert("minimum_should_match".to_string(), json!(1));
        }
    }

    json!({ "bool": Value::Object(bool_query) })
}

fn terms_clause(field: &str, values: &[TermValue]) -> Value {
    if values.len() == 1 {
        json!({ "term": { field: values[0] } })
    } else {
        json!({ "terms": { field: values } })
    }
}

fn phrase_clause(p: &PhraseQuery) -> Value {
    let fields: Vec<String> = p
        .fields
        .iter()
        .map(|f| format!("{}^{}", f.field, f.boost))
        .collect();

    json!({
        "multi_match": {
            "query": p.sentence,
            "type": "phrase",
            "slop": p.slop,
            "fields": fields
        }
    })
}

/// Renders a complete search request body.
///
/// Unbounded requests ask for a full result window; Elasticsearch would
/// otherwise return only its default of 10 hits.
pub fn search_body(request: &IndexRequest) -> Value {
    let size = request
        .max_results
        .unwrap_or(MAX_RESULT_WINDOW)
        .min(MAX_RESULT_WINDOW);

    json!({
        "query": to_query_dsl(&request.query),
        "_source": [request.projection.field()],
        "size": size,
        "track_total_hits": true,
    })
}

/// Creates the index settings and mapping for full-text fields.
///
/// The content text is copied into three extra projections, each with its own
/// analyzer:
/// - `content_text_edge_ngram`: phrases split at punctuation, edge n-grams 3..50
/// - `content_text_ngram`: words, n-grams 3..20
/// - `content_text_phonetic`: words, Soundex codes (requires the `analysis-phonetic` plugin)
pub fn index_mapping() -> Value {
    json!({
        "settings": {
            "index.max_ngram_diff": 47,
            "index.max_result_window": MAX_RESULT_WINDOW,
            "analysis": {
                "tokenizer": {
                    "phrase_tokenizer": {
                        "type": "pattern",
                        "pattern": "[.,!?;:\\n\\r]+"
                    }
                },
                "filter": {
                    "autocomplete_edge_ngram": {
                        "type": "edge_ngram",
                        "min_gram": 3,
                        "max_gram": 50
                    },
                    "autocomplete_ngram": {
                        "type": "ngram",
                        "min_gram": 3,
                        "max_gram": 20
                    },
                    "autocomplete_soundex": {
                        "type": "phonetic",
                        "encoder": "soundex",
                        "replace": true
                    }
                },
                "analyzer": {
                    "autocomplete_edge": {
                        "type": "custom",
                        "tokenizer": "phrase_tokenizer",
                        "filter": ["trim", "lowercase", "autocomplete_edge_ngram"]
                    },
                    "autocomplete_ngram": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "autocomplete_ngram"]
                    },
                    "autocomplete_phonetic": {
                        "type": "custom",
                        "tokenizer": "standard",
                        "filter": ["lowercase", "autocomplete_soundex"]
                    }
                }
            }
        },
        "mappings": {
            "properties": {
                (fields::ID): { "type": "long" },
                (fields::RESOURCE_TYPE): { "type": "keyword" },
                "resource_links": {
                    "properties": {
                        "target_resource_pid": { "type": "long" }
                    }
                },
                (fields::NARRATIVE_TEXT): {
                    "type": "text",
                    "analyzer": "standard"
                },
                (fields::CONTENT_TEXT): {
                    "type": "text",
                    "analyzer": "standard",
                    "copy_to": [
                        fields::CONTENT_TEXT_EDGE_NGRAM,
                        fields::CONTENT_TEXT_NGRAM,
                        fields::CONTENT_TEXT_PHONETIC
                    ]
                },
                (fields::CONTENT_TEXT_EDGE_NGRAM): {
                    "type": "text",
                    "analyzer": "autocomplete_edge",
                    "search_analyzer": "autocomplete_edge"
                },
                (fields::CONTENT_TEXT_NGRAM): {
                    "type": "text",
                    "analyzer": "autocomplete_ngram"
                },
                (fields::CONTENT_TEXT_PHONETIC): {
                    "type": "text",
                    "analyzer": "autocomplete_phonetic"
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Projection;
    use crate::query::BoostedField;

    #[test]
    fn test_keyword_clause() {
        let dsl = to_query_dsl(&TextQuery::keyword(fields::CONTENT_TEXT, "aspirin daily"));
        assert_eq!(dsl["match"]["content_text"]["query"], "aspirin daily");
        assert_eq!(dsl["match"]["content_text"]["operator"], "or");
    }

    #[test]
    fn test_terms_clause() {
        let single = to_query_dsl(&TextQuery::term(fields::RESOURCE_LINKS, 7_i64));
        assert_eq!(single, json!({ "term": { (fields::RESOURCE_LINKS): 7 } }));

        let multi = to_query_dsl(&TextQuery::terms(fields::RESOURCE_LINKS, [1_i64, 2]));
        assert_eq!(multi, json!({ "terms": { (fields::RESOURCE_LINKS): [1, 2] } }));

        let keyword = to_query_dsl(&TextQuery::term(fields::RESOURCE_TYPE, "Patient"));
        assert_eq!(keyword["term"]["resource_type"], "Patient");
    }

    #[test]
    fn test_phrase_clause_carries_boosts_and_slop() {
        let dsl = to_query_dsl(&TextQuery::Phrase(PhraseQuery {
            fields: vec![
                BoostedField::new(fields::CONTENT_TEXT, 4.0),
                BoostedField::new(fields::CONTENT_TEXT_PHONETIC, 0.5),
            ],
            sentence: "aspi".to_string(),
            slop: 2,
        }));

        assert_eq!(dsl["multi_match"]["type"], "phrase");
        assert_eq!(dsl["multi_match"]["slop"], 2);
        assert_eq!(
            dsl["multi_match"]["fields"],
            json!(["content_text^4", "content_text_phonetic^0.5"])
        );
    }

    #[test]
    fn test_bool_clause() {
        let mut b = BoolQuery::new();
        b.must(TextQuery::keyword(fields::NARRATIVE_TEXT, "fever"));
        let dsl = to_query_dsl(&b.clone().into());
        assert_eq!(dsl["bool"]["must"].as_array().unwrap().len(), 1);
        assert!(dsl["bool"].get("should").is_none());

        let mut should_only = BoolQuery::new();
        should_only.should(TextQuery::keyword(fields::NARRATIVE_TEXT, "fever"));
        let dsl = to_query_dsl(&should_only.into());
        assert_eq!(dsl["bool"]["minimum_should_match"], 1);
    }

    #[test]
    fn test_search_body_projection_and_size() {
        let request = IndexRequest::new(TextQuery::term(fields::ID, 1_i64), Projection::ContentText)
            .with_max_results(20);
        let body = search_body(&request);
        assert_eq!(body["_source"], json!(["content_text"]));
        assert_eq!(body["size"], 20);

        let unbounded = IndexRequest::new(TextQuery::term(fields::ID, 1_i64), Projection::Id);
        assert_eq!(search_body(&unbounded)["size"], MAX_RESULT_WINDOW);

        let oversized = IndexRequest::new(TextQuery::term(fields::ID, 1_i64), Projection::Id)
            .with_max_results(50_000);
        assert_eq!(search_body(&oversized)["size"], MAX_RESULT_WINDOW);
    }

    #[test]
    fn test_index_mapping_declares_projections() {
        let mapping = index_mapping();
        let props = &mapping["mappings"]["properties"];
        assert_eq!(props["content_text_edge_ngram"]["analyzer"], "autocomplete_edge");
        assert_eq!(props["content_text_ngram"]["analyzer"], "autocomplete_ngram");
        assert_eq!(props["content_text_phonetic"]["analyzer"], "autocomplete_phonetic");
        assert_eq!(props["content_text"]["copy_to"].as_array().unwrap().len(), 3);
        assert_eq!(mapping["settings"]["index.max_result_window"], MAX_RESULT_WINDOW);
    }
}
