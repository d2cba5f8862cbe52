pub mod get_client_ip;
pub mod key_kind;
pub mod markdown;
