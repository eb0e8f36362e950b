pub mod chat_log;
