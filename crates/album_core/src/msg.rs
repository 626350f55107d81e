use crate::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Begin the run from cursor 0.
    Start,
    /// A page was fetched and decoded.
    PageReceived(Page),
    /// A fetch, decode or output step failed.
    StepFailed,
}
