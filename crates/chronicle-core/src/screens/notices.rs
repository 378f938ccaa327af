use tracing::warn;

use crate::api::ApiClient;
use crate::models::Notice;
use crate::utils::{format_date, format_optional, truncate_string};

/// Shown in place of the list when there is nothing to show.
pub const EMPTY_BOARD: &str = "No notices yet.";

/// Descriptions longer than this are cut on the board.
const DESCRIPTION_MAX_LEN: usize = 280;

/// Fetch notices for display. Any failure yields an empty list.
pub async fn load_notices(api: &ApiClient, notice_type: Option<&str>) -> Vec<Notice> {
    match api.fetch_notices(notice_type).await {
        Ok(notices) => notices,
        Err(e) => {
            warn!(error = %e, "Failed to fetch notices, showing empty board");
            Vec::new()
        }
    }
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    pub notice_type: Option<String>,
    pub notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new(notice_type: Option<String>) -> Self {
        Self {
            notice_type,
            notices: Vec::new(),
        }
    }

    pub async fn load(&mut self, api: &ApiClient) -> &[Notice] {
        self.notices = load_notices(api, self.notice_type.as_deref()).await;
        &self.notices
    }

    pub fn render_lines(&self) -> Vec<String> {
        if self.notices.is_empty() {
            return vec![EMPTY_BOARD.to_string()];
        }

        let mut lines = Vec::with_capacity(self.notices.len() * 4);
        for (i, notice) in self.notices.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            let date = notice.created_at().map(|d| format_date(&d));
            lines.push(notice.title.clone());
            lines.push(format!(
                "  {} · {}",
                notice.notice_type,
                format_optional(date.as_deref(), "undated")
            ));
            lines.push(format!("  {}", truncate_string(&notice.description, DESCRIPTION_MAX_LEN)));
        }
        lines
    }
}
