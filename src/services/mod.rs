pub mod discovery_service;
pub mod match_service;
pub mod normalize_service;
pub mod scan_service;
pub mod search_service;
pub mod similarity_service;
pub mod tokenize_service;
