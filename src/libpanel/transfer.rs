use crate::libpanel::api::{ApiClient, Transport};
use crate::libpanel::error::Result;
use crate::libpanel::model::{ContentBlock, Entity, NewsItem, Test};
use colored::Colorize;
use log::{error, info};
use serde::{Deserialize, Serialize};

/// Everything the backend holds, in one file.
#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct TransferDocument {
    #[serde(default)]
    pub tests: Vec<Test>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentBlock>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
    pub content_replaced: bool,
}

pub fn export<T: Transport>(api: &ApiClient<T>) -> Result<TransferDocument> {
    let tests = Test::into_items(api.fetch::<Test>()?);
    let news = NewsItem::into_items(api.fetch::<NewsItem>()?);
    let content = api.fetch_content()?;
    info!(
        "{}",
        format!("[Transfer] Exported {} tests and {} news items", tests.len(), news.len()).blue()
    );
    Ok(TransferDocument {
        tests,
        news,
        content: Some(content),
    })
}

fn import_all<E: Entity, T: Transport>(api: &ApiClient<T>, items: &[E], report: &mut ImportReport) {
    info!(
        "{}",
        format!("├ {} ({} items)", E::KIND, items.len()).blue()
    );
    for item in items {
        if let Err(err) = item.validate() {
            error!(
                "{} {}",
                "│".blue(),
                format!("├ ✘ {}: {:?} ({})", E::KIND.label(), item.title(), err)
                    .red()
                    .strikethrough()
            );
            report.skipped += 1;
            continue;
        }
        match api.create::<E, E::Create>(&E::Create::from(item)) {
            Ok(()) => {
                info!("{} {}", "│".blue(), format!("├ {}: {:?}", E::KIND.label(), item.title()).green());
                report.created += 1;
            }
            Err(err) => {
                error!("{} {}", "│".blue(), format!("├ ✘ {}: {}", item.title(), err).red());
                report.failed += 1;
            }
        }
    }
}

/// Posts every valid entity as new and replaces the content block if present.
/// Server ids in the document are ignored.
pub fn import<T: Transport>(api: &ApiClient<T>, document: &TransferDocument) -> ImportReport {
    let mut report = ImportReport::default();
    import_all::<Test, T>(api, &document.tests, &mut report);
    import_all::<NewsItem, T>(api, &document.news, &mut report);

    if let Some(content) = &document.content {
        match api.replace_content(content) {
            Ok(()) => {
                info!("{}", "├ content replaced".blue());
                report.content_replaced = true;
            }
            Err(err) => {
                error!("{}", format!("├ ✘ content: {err}").red());
                report.failed += 1;
            }
        }
    }
    report
}
