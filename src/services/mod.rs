pub mod exam_service;
pub mod review_gate;
pub mod score_aggregator;
