pub(crate) mod avif;
pub(crate) mod gif;
pub(crate) mod opts;
pub(crate) mod screens;
pub(crate) mod sink;
pub(crate) mod webp;
