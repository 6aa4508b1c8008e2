pub struct Icons;

impl Icons {
    pub const DATABASE: &str = "🗄️";
    pub const FOLDER: &str = "📁";
    pub const SOURCE: &str = "📄";
    pub const PRODUCT: &str = "📦";
    pub const JOB: &str = "⚙️";
    pub const LINK: &str = "🔗";
    pub const SEARCH: &str = "🔍";
    pub const STATS: &str = "📊";
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const HOURGLASS: &str = "⏳";
    pub const DIRECT: &str = "🔴";
    pub const INDIRECT: &str = "🟠";
}
