//! Progress reporting for pipeline execution

use colored::Colorize;
use deepthink_application::ports::progress::ProgressNotifier;
use deepthink_domain::Stage;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a pipeline run with one bar per stage
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn stage_label(stage: &Stage) -> String {
        let number = match stage {
            Stage::Planning => 1,
            Stage::Research => 2,
            Stage::Thinking => 3,
            Stage::Critique => 4,
            Stage::Refinement => 5,
            Stage::MetaRefinement => 6,
        };
        format!("Stage {}: {}", number, stage.display_name())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: &Stage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(Self::stage_label(stage));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.stage_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, _stage: &Stage, label: &str, success: bool) {
        if let Ok(slot) = self.stage_bar.lock()
            && let Some(pb) = slot.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), label)
            } else {
                format!("{} {}", "x".red(), label)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: &Stage) {
        if let Ok(mut slot) = self.stage_bar.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_with_message(format!("{} complete", stage.display_name().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: &Stage, total_tasks: usize) {
        println!(
            "{} {} ({} tasks)",
            "->".cyan(),
            ProgressReporter::stage_label(stage).bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _stage: &Stage, label: &str, success: bool) {
        if success {
            println!("  {} {}", "v".green(), label);
        } else {
            println!("  {} {} (failed)", "x".red(), label);
        }
    }

    fn on_stage_complete(&self, _stage: &Stage) {
        println!();
    }
}
