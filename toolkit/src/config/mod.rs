pub mod settings;

pub use settings::{
    ApiSettings, AppSettings, ColumnSchema, DraftSettings, ExportSettings, NotificationSettings,
    PrintSettings, Settings, ShortcutSettings,
};
