pub mod data;
pub mod prefs;
pub mod session;
pub mod stats;

use std::rc::Rc;

use focusbubble_core::storage::Config;
use focusbubble_core::{App, CoreError, SqliteStore, SystemTimeSource};

/// Open the store and rebuild the application context, re-hydrating any
/// persisted session. The CLI has no focus signals of its own, so the
/// detector is seeded as focused.
pub fn load_app() -> Result<App<SqliteStore>, CoreError> {
    let store = SqliteStore::open()?;
    let config = Config::load_or_default();
    let mut app = App::new(store, Rc::new(SystemTimeSource), &config)?;
    app.restore(true)?;
    Ok(app)
}
