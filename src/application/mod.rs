pub mod page_service;
