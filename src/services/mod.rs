pub mod structure_sweep;
pub mod test_service;
