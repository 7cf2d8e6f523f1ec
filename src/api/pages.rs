use crate::database::ChatRecord;
use askama::Template;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage;

/// Rows render in the order given; the handler passes them newest first.
#[derive(Template)]
#[template(path = "history.html")]
pub struct HistoryPage<'a> {
    pub chats: &'a [ChatRecord],
}
