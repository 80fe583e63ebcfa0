// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  gizmo::*,
  image::*,
  matcher::*,
  parameters::*,
  synthetic::*,
  template::*,
  timeline::*,
  tracker::*,
  types::*,
  update::*,
  util::*,
};

pub use {
  std::{
    fmt,
    fs::File,
    io::Write,
    ops::Index,
    sync::Mutex,
  },
  log::{debug, info, warn, LevelFilter},
  anyhow::{anyhow, bail, Context as AnyhowContext, Result},
};
