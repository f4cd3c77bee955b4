pub mod calendar;
pub mod derivation;
pub mod grid;
pub mod heatmap;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod loader;
pub mod month;
pub mod parser;
pub mod persistence;
pub mod roster;
pub mod settings;
pub mod shift;
pub mod tidy;

pub use calendar::{CalendarError, WorkCalendar};
pub use derivation::{Derivation, apply_derivation};
pub use grid::RawGrid;
pub use heatmap::{HeatmapError, heatmap_path};
pub use loader::{LoadReport, SourceFailure, SourceReadError, load_schedule_dir};
pub use month::{MonthKey, MonthKeyError};
pub use parser::{ConfigError, ParseDiagnostic, ParsedGrid, ShiftAssignment, parse, parse_anchored};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteRosterStore;
pub use persistence::{
    PersistenceError, RosterSnapshot, RosterStore, export_roster_to_csv, load_roster_from_json,
    save_roster_to_json, save_tidy_to_csv,
};
pub use roster::{Roster, RosterCell, RosterError};
pub use settings::{Settings, SettingsError};
pub use shift::{InvalidPerson, PersonId, ShiftType};
pub use tidy::{DayEntry, TidySchedule};
