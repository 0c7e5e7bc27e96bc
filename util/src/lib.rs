pub mod notify;
pub mod paths;
pub mod storage;
pub mod test_helpers;
