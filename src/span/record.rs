use serde::Serialize;

use super::super::Identifier;

use super::annotation::AnnotationRecord;
use super::metadata::BinaryAnnotationRecord;


/// A `Span` rendered into the Zipkin v1 JSON shape.
///
/// `parentId` and `binaryAnnotations` are left out of the JSON entirely when
/// absent, as strict Zipkin consumers reject unexpected `null` fields.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanRecord {
    pub id: Identifier,
    pub trace_id: Identifier,
    pub name: String,
    pub debug: bool,
    pub timestamp: u64,
    pub duration: u64,
    pub annotations: Vec<AnnotationRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Identifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_annotations: Option<Vec<BinaryAnnotationRecord>>,
}
