//! Generated wire types for `proto/scoregraph.proto`.

tonic::include_proto!("scoregraph");

use crate::domain::model::GraphPoint;

impl From<GraphPoint> for GraphDataPoint {
    fn from(point: GraphPoint) -> Self {
        Self {
            label: point.label,
            value: point.value,
        }
    }
}

impl From<GraphDataPoint> for GraphPoint {
    fn from(point: GraphDataPoint) -> Self {
        Self {
            label: point.label,
            value: point.value,
        }
    }
}
