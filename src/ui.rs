pub mod compare_view;
pub mod dialog;
pub mod title_bar;
pub mod toasts;
pub mod viewport;
