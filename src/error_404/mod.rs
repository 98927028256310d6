pub mod error_404;
