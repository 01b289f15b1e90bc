use std::fmt;
use std::path::PathBuf;

use spdlog::{error, info};

use crate::config::Config;
use crate::content::collector::collect_posts;
use crate::content::markup::{CodeHighlighter, MarkupRenderer};
use crate::error::BuildError;
use crate::layout::LayoutSet;
use crate::render::{render_index, render_posts, sort_posts};
use crate::util::fs_utils::{clean_dir, copy_dir};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuildStage {
    Init,
    Cleaning,
    CollectingContent,
    Sorting,
    LoadingLayouts,
    RenderingPosts,
    RenderingIndex,
    CopyingStatic,
    Done,
    Failed,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStage::Init => "init",
            BuildStage::Cleaning => "cleaning",
            BuildStage::CollectingContent => "collecting content",
            BuildStage::Sorting => "sorting",
            BuildStage::LoadingLayouts => "loading layouts",
            BuildStage::RenderingPosts => "rendering posts",
            BuildStage::RenderingIndex => "rendering index",
            BuildStage::CopyingStatic => "copying static files",
            BuildStage::Done => "done",
            BuildStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub posts: usize,
    pub static_files: usize,
    pub publish_dir: PathBuf,
}

/// Runs one build from the content tree to the publish directory.
/// Stages run in order and the first error stops the build, leaving
/// whatever was already written in place.
pub struct SiteBuilder<'c> {
    config: &'c Config,
    markup: MarkupRenderer,
    stage: BuildStage,
}

impl<'c> SiteBuilder<'c> {
    pub fn new(config: &'c Config) -> SiteBuilder<'c> {
        SiteBuilder {
            config,
            markup: MarkupRenderer::new(&config.content),
            stage: BuildStage::Init,
        }
    }

    pub fn with_highlighter(mut self, highlighter: Box<dyn CodeHighlighter>) -> SiteBuilder<'c> {
        self.markup = self.markup.with_highlighter(highlighter);
        self
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    pub fn run(&mut self) -> Result<BuildSummary, BuildError> {
        match self.run_stages() {
            Ok(summary) => {
                self.enter(BuildStage::Done);
                info!("Built {} posts and {} static files into {}",
                    summary.posts, summary.static_files, summary.publish_dir.display());
                Ok(summary)
            }
            Err(e) => {
                error!("Build failed while {}: {}", self.stage, e);
                self.enter(BuildStage::Failed);
                Err(e)
            }
        }
    }

    fn enter(&mut self, stage: BuildStage) {
        info!("Build stage: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    fn run_stages(&mut self) -> Result<BuildSummary, BuildError> {
        let config = self.config;
        let paths = &config.paths;

        if config.clean {
            self.enter(BuildStage::Cleaning);
            clean_dir(&paths.publish_dir)?;
        }

        self.enter(BuildStage::CollectingContent);
        let mut posts = collect_posts(&paths.content_dir, &config.front_matter)?;

        self.enter(BuildStage::Sorting);
        sort_posts(&mut posts);

        self.enter(BuildStage::LoadingLayouts);
        let layouts = LayoutSet::load(&paths.layout_dir)?;

        self.enter(BuildStage::RenderingPosts);
        let rendered = render_posts(&posts, &layouts, &self.markup, &paths.publish_dir)?;

        self.enter(BuildStage::RenderingIndex);
        render_index(&rendered, &layouts, &paths.publish_dir)?;

        self.enter(BuildStage::CopyingStatic);
        let static_dest = match paths.static_dir.file_name() {
            Some(name) => paths.publish_dir.join(name),
            None => paths.publish_dir.clone(),
        };
        let static_files = copy_dir(&paths.static_dir, &static_dest)?;

        Ok(BuildSummary {
            posts: rendered.len(),
            static_files,
            publish_dir: paths.publish_dir.clone(),
        })
    }
}

/// Builds the whole site described by `config`.
pub fn build(config: &Config) -> Result<BuildSummary, BuildError> {
    SiteBuilder::new(config).run()
}
