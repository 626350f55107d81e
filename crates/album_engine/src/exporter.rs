use std::collections::VecDeque;
use std::path::PathBuf;

use album_core::{update, Effect, Msg, PagingState, Post, StopReason, TargetLabel};

use crate::fetch::{LogProgressSink, PageSource, ProgressSink, ReqwestPageSource};
use crate::filename::export_filename;
use crate::persist::{ensure_output_dir, ExportTarget, PersistError};
use crate::{ExportConfig, ExportError, ExportEvent, PageRequest};

/// Outcome of one export run. Failures after the run started land in `failure`.
#[derive(Debug)]
pub struct ExportReport {
    /// `None` when no page ever carried posts.
    pub output_path: Option<PathBuf>,
    pub posts_written: usize,
    pub requests_issued: u32,
    pub last_rank: i64,
    pub stop: StopReason,
    pub failure: Option<ExportError>,
}

/// Drives the paging state machine against a [`PageSource`] and appends posts to disk.
pub struct AlbumExporter {
    config: ExportConfig,
    source: Box<dyn PageSource>,
    sink: Box<dyn ProgressSink>,
}

impl AlbumExporter {
    /// Exporter against the configured HTTP endpoint, reporting progress to the log.
    pub fn new(config: ExportConfig) -> Result<Self, ExportError> {
        let source = ReqwestPageSource::new(&config)?;
        Ok(Self::with_source(config, Box::new(source)))
    }

    pub fn with_source(config: ExportConfig, source: Box<dyn PageSource>) -> Self {
        Self {
            config,
            source,
            sink: Box::new(LogProgressSink),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Runs the export to completion.
    ///
    /// Only a missing or unwritable output directory is returned as `Err`; fetch, decode
    /// and write failures end the run early and are reported in [`ExportReport::failure`],
    /// with everything written so far left on disk.
    pub async fn run(&self) -> Result<ExportReport, ExportError> {
        ensure_output_dir(&self.config.output_dir)?;
        self.sink.emit(ExportEvent::Started {
            album_id: self.config.album_id.clone(),
            output_dir: self.config.output_dir.clone(),
        });

        let mut target: Option<ExportTarget> = None;
        let mut posts_written = 0usize;
        let mut failure = None;

        let (mut state, effects) = update(PagingState::new(), Msg::Start);
        let mut queue: VecDeque<Effect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            let step = match effect {
                Effect::FetchPage { last_rank } => {
                    self.fetch(state.requests_issued(), last_rank).await
                }
                Effect::ResolveTarget(label) => self.resolve_target(&label, &mut target),
                Effect::AppendPosts(posts) => self.append_posts(
                    &posts,
                    state.pages_received(),
                    &mut target,
                    &mut posts_written,
                ),
                Effect::Pause => {
                    self.pause().await;
                    Ok(None)
                }
                Effect::Finish(_) => Ok(None),
            };

            let msg = match step {
                Ok(Some(msg)) => msg,
                Ok(None) => continue,
                Err(err) => {
                    self.sink.emit(ExportEvent::Failed {
                        kind: err.kind(),
                        message: err.to_string(),
                    });
                    failure = Some(err);
                    queue.clear();
                    Msg::StepFailed
                }
            };
            let (next, effects) = update(state, msg);
            state = next;
            queue.extend(effects);
        }

        let report = ExportReport {
            output_path: target.as_ref().map(|t| t.path().to_path_buf()),
            posts_written,
            requests_issued: state.requests_issued(),
            last_rank: state.cursor(),
            stop: state.stop_reason().unwrap_or(StopReason::Failed),
            failure,
        };
        self.sink.emit(ExportEvent::Finished {
            output_path: report.output_path.clone(),
            posts_written: report.posts_written,
            stop: report.stop,
        });
        Ok(report)
    }

    async fn fetch(&self, page: u32, last_rank: i64) -> Result<Option<Msg>, ExportError> {
        self.sink.emit(ExportEvent::FetchingPage { page, last_rank });
        let request = PageRequest {
            album_id: self.config.album_id.clone(),
            last_rank,
        };
        let page = self.source.fetch_page(&request).await?;
        Ok(Some(Msg::PageReceived(page)))
    }

    fn resolve_target(
        &self,
        label: &TargetLabel,
        target: &mut Option<ExportTarget>,
    ) -> Result<Option<Msg>, ExportError> {
        let created = ExportTarget::create(
            &self.config.output_dir,
            &export_filename(label),
            self.config.toc_format,
        )?;
        self.sink.emit(ExportEvent::TargetResolved {
            path: created.path().to_path_buf(),
        });
        *target = Some(created);
        Ok(None)
    }

    fn append_posts(
        &self,
        posts: &[Post],
        page: u32,
        target: &mut Option<ExportTarget>,
        posts_written: &mut usize,
    ) -> Result<Option<Msg>, ExportError> {
        let target = target.as_mut().ok_or(PersistError::Unresolved)?;
        for post in posts {
            target.append_post(post)?;
            *posts_written += 1;
        }
        target.sync()?;
        self.sink.emit(ExportEvent::PostsWritten {
            page,
            count: posts.len(),
            total: *posts_written,
        });
        Ok(None)
    }

    async fn pause(&self) {
        if !self.config.page_delay.is_zero() {
            tokio::time::sleep(self.config.page_delay).await;
        }
    }
}
