pub mod classify;
pub mod dry_run;
pub mod inspect;
