pub mod request_store;
