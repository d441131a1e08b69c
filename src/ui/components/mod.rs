pub mod dialog;
pub mod input_bar;
pub mod session_list;
pub mod setup_form;
pub mod transcript_view;
