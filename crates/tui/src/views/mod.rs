pub mod event_form;
pub mod event_list;
pub mod help;
pub mod login;
pub mod modal;
