//! RCSB Search API v2 query trees.
//!
//! A query is either a terminal node evaluated by one search service or a
//! group combining child nodes with a logical operator. The serde layout
//! matches the JSON the service expects, so a [`Node`] can be posted as is.

use serde::{Deserialize, Serialize};

use crate::error::HarvestError;

pub const ORGANISM_ATTRIBUTE: &str = "rcsb_entity_source_organism.taxonomy_lineage.name";
pub const METHOD_ATTRIBUTE: &str = "exptl.method";
pub const KEYWORD_ATTRIBUTE: &str = "struct.title";
pub const SEQUENCE_TARGET: &str = "pdb_protein_sequence";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Text,
    Sequence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOperator {
    ContainsWords,
    ExactMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameters {
    Text {
        attribute: String,
        operator: TextOperator,
        value: String,
    },
    Sequence {
        value: String,
        target: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Terminal {
        service: Service,
        parameters: Parameters,
    },
    Group {
        logical_operator: LogicalOperator,
        nodes: Vec<Node>,
    },
}

impl Node {
    pub fn text(attribute: &str, operator: TextOperator, value: &str) -> Self {
        Node::Terminal {
            service: Service::Text,
            parameters: Parameters::Text {
                attribute: attribute.to_string(),
                operator,
                value: value.to_string(),
            },
        }
    }

    fn any_of(attribute: &str, operator: TextOperator, values: &[String]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Node::Group {
            logical_operator: LogicalOperator::Or,
            nodes: values
                .iter()
                .map(|value| Node::text(attribute, operator, value))
                .collect(),
        })
    }
}

/// Filters for a text search. Values within a category are OR-ed, the
/// categories present are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub organisms: Vec<String>,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty() && self.methods.is_empty() && self.keywords.is_empty()
    }

    pub fn build(&self) -> Result<Node, HarvestError> {
        let nodes = [
            Node::any_of(ORGANISM_ATTRIBUTE, TextOperator::ContainsWords, &self.organisms),
            Node::any_of(METHOD_ATTRIBUTE, TextOperator::ExactMatch, &self.methods),
            Node::any_of(KEYWORD_ATTRIBUTE, TextOperator::ContainsWords, &self.keywords),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

        if nodes.is_empty() {
            return Err(HarvestError::NoCriteria);
        }

        Ok(Node::Group {
            logical_operator: LogicalOperator::And,
            nodes,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceQuery {
    sequence: String,
}

impl SequenceQuery {
    pub fn new(sequence: &str) -> Result<Self, HarvestError> {
        if sequence.trim().is_empty() {
            return Err(HarvestError::EmptySequence);
        }
        Ok(Self {
            sequence: sequence.to_string(),
        })
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    pub fn build(&self) -> Node {
        Node::Terminal {
            service: Service::Sequence,
            parameters: Parameters::Sequence {
                value: self.sequence.clone(),
                target: SEQUENCE_TARGET.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a Node,
    pub return_type: &'static str,
    pub request_options: RequestOptions,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RequestOptions {
    pub paginate: Paginate,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Paginate {
    pub start: usize,
    pub rows: usize,
}

impl<'a> SearchRequest<'a> {
    pub fn entries(query: &'a Node, start: usize, rows: usize) -> Self {
        Self {
            query,
            return_type: "entry",
            request_options: RequestOptions {
                paginate: Paginate { start, rows },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn empty_criteria_is_usage_error() {
        let err = SearchCriteria::default().build().unwrap_err();
        assert_matches!(err, HarvestError::NoCriteria);
    }

    #[test]
    fn one_group_per_present_category() {
        let criteria = SearchCriteria {
            organisms: strings(&["Homo sapiens", "Mus musculus"]),
            methods: Vec::new(),
            keywords: strings(&["kinase"]),
        };
        let Node::Group {
            logical_operator,
            nodes,
        } = criteria.build().unwrap()
        else {
            panic!("expected group");
        };
        assert_eq!(logical_operator, LogicalOperator::And);
        assert_eq!(nodes.len(), 2);
        assert_matches!(
            &nodes[0],
            Node::Group { logical_operator: LogicalOperator::Or, nodes } if nodes.len() == 2
        );
        assert_matches!(
            &nodes[1],
            Node::Group { logical_operator: LogicalOperator::Or, nodes } if nodes.len() == 1
        );
    }

    #[test]
    fn method_terminal_uses_exact_match() {
        let criteria = SearchCriteria {
            methods: strings(&["X-RAY DIFFRACTION"]),
            ..SearchCriteria::default()
        };
        let value = serde_json::to_value(criteria.build().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "group",
                "logical_operator": "and",
                "nodes": [{
                    "type": "group",
                    "logical_operator": "or",
                    "nodes": [{
                        "type": "terminal",
                        "service": "text",
                        "parameters": {
                            "attribute": "exptl.method",
                            "operator": "exact_match",
                            "value": "X-RAY DIFFRACTION"
                        }
                    }]
                }]
            })
        );
    }

    #[test]
    fn all_categories_in_fixed_order() {
        let criteria = SearchCriteria {
            organisms: strings(&["Homo sapiens"]),
            methods: strings(&["SOLUTION NMR"]),
            keywords: strings(&["hemoglobin", "globin"]),
        };
        let value = serde_json::to_value(criteria.build().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "group",
                "logical_operator": "and",
                "nodes": [
                    {
                        "type": "group",
                        "logical_operator": "or",
                        "nodes": [{
                            "type": "terminal",
                            "service": "text",
                            "parameters": {
                                "attribute": "rcsb_entity_source_organism.taxonomy_lineage.name",
                                "operator": "contains_words",
                                "value": "Homo sapiens"
                            }
                        }]
                    },
                    {
                        "type": "group",
                        "logical_operator": "or",
                        "nodes": [{
                            "type": "terminal",
                            "service": "text",
                            "parameters": {
                                "attribute": "exptl.method",
                                "operator": "exact_match",
                                "value": "SOLUTION NMR"
                            }
                        }]
                    },
                    {
                        "type": "group",
                        "logical_operator": "or",
                        "nodes": [
                            {
                                "type": "terminal",
                                "service": "text",
                                "parameters": {
                                    "attribute": "struct.title",
                                    "operator": "contains_words",
                                    "value": "hemoglobin"
                                }
                            },
                            {
                                "type": "terminal",
                                "service": "text",
                                "parameters": {
                                    "attribute": "struct.title",
                                    "operator": "contains_words",
                                    "value": "globin"
                                }
                            }
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn values_are_not_normalized() {
        let criteria = SearchCriteria {
            keywords: strings(&["  Hemoglobin  "]),
            ..SearchCriteria::default()
        };
        let value = serde_json::to_value(criteria.build().unwrap()).unwrap();
        assert_eq!(
            value["nodes"][0]["nodes"][0]["parameters"]["value"],
            "  Hemoglobin  "
        );
        assert_eq!(
            value["nodes"][0]["nodes"][0]["parameters"]["operator"],
            "contains_words"
        );
    }

    #[test]
    fn sequence_query_is_single_terminal() {
        let query = SequenceQuery::new("MVLSPADKTNVKAAWGKVGA").unwrap();
        let value = serde_json::to_value(query.build()).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "terminal",
                "service": "sequence",
                "parameters": {
                    "value": "MVLSPADKTNVKAAWGKVGA",
                    "target": "pdb_protein_sequence"
                }
            })
        );
    }

    #[test]
    fn blank_sequence_rejected() {
        assert_matches!(SequenceQuery::new("  "), Err(HarvestError::EmptySequence));
    }

    #[test]
    fn request_payload_layout() {
        let node = SequenceQuery::new("MKT").unwrap().build();
        let value = serde_json::to_value(SearchRequest::entries(&node, 200, 100)).unwrap();
        assert_eq!(value["return_type"], "entry");
        assert_eq!(value["request_options"]["paginate"]["start"], 200);
        assert_eq!(value["request_options"]["paginate"]["rows"], 100);
        assert_eq!(value["query"]["service"], "sequence");
    }

    #[test]
    fn node_round_trips_from_service_json() {
        let raw = json!({
            "type": "terminal",
            "service": "text",
            "parameters": {
                "attribute": "struct.title",
                "operator": "contains_words",
                "value": "lysozyme"
            }
        });
        let node: Node = serde_json::from_value(raw).unwrap();
        assert_eq!(
            node,
            Node::text(KEYWORD_ATTRIBUTE, TextOperator::ContainsWords, "lysozyme")
        );
    }
}
