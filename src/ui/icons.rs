pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const FILE: &str = "📄";
    pub const TEXT: &str = "📝";
    pub const IMAGE: &str = "🖼️";
    pub const VIDEO: &str = "🎬";
    pub const AUDIO: &str = "🎵";
    pub const DEL: &str = "🗑️";
    pub const PACKAGE: &str = "📦";
    pub const DATABASE: &str = "🗄️";
    pub const DOWN: &str = "⬇️";
    pub const PLAY: &str = "▶️";
}
