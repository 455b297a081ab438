pub mod account;
pub mod match_record;
