/// Context keys shared by the recap stages.
pub mod session_keys {
    /// Raw query text, set before the graph runs.
    pub const QUERY: &str = "query";
    /// [`crate::models::Intent`] written by the parse stage.
    pub const INTENT: &str = "intent";
    pub const SHOW: &str = "show";
    /// [`crate::resolver::RecapScope`] written by validation.
    pub const SCOPE: &str = "scope";
    pub const DESCRIPTION: &str = "description";
    pub const EPISODES: &str = "episodes";
    pub const RECAP: &str = "recap";
}
