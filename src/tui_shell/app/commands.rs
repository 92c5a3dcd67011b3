use std::rc::Rc;
use std::sync::Arc;

use crate::compare::{Applied, CompareCommand};
use crate::keymap::Command;
use crate::persist::SaveJob;

use super::super::views::{BrowseEntry, BrowseView, CompareView, ImagesView};
use super::App;

impl App {
    pub(super) fn run_command(&mut self, cmd: Command) {
        match cmd {
            Command::ToggleHelp => self.show_help = !self.show_help,
            Command::NavigateUp => self.view_mut().move_up(),
            Command::NavigateDown => self.view_mut().move_down(),
            Command::NavigateLeft => self.view_mut().move_left(),
            Command::NavigateRight => self.view_mut().move_right(),
            Command::SelectFolder => self.open_selected_entry(),
            Command::GoBack => self.go_back(),
            Command::ToggleSelect => {
                if let Some(v) = self.images_view_mut() {
                    v.toggle_focused();
                }
            }
            Command::SelectAll => {
                if let Some(v) = self.images_view_mut() {
                    v.toggle_all();
                }
            }
            Command::SelectByGlob => {
                if self.images_view_mut().is_some() {
                    self.glob_input.clear();
                    self.glob_open = true;
                }
            }
            Command::StartComparison => self.start_comparison(),
            Command::Compare(c) => self.apply_compare(c),
        }
    }

    fn go_back(&mut self) {
        if self.views.is_empty() {
            self.quit = true;
        } else {
            self.pop_view();
        }
    }

    fn open_selected_entry(&mut self) {
        let Some(browse) = self.view().as_any().downcast_ref::<BrowseView>() else {
            return;
        };
        match browse.selected_entry() {
            Some(BrowseEntry::Images { folder, .. }) => match self.service.list_images(&folder) {
                Ok(images) => self.push_view(Box::new(ImagesView::new(folder, images))),
                Err(err) => self.error(format!("list images: {err}")),
            },
            Some(BrowseEntry::Folder { path }) => match self.service.list_folder_contents(&path) {
                Ok(folder) => self.push_view(Box::new(BrowseView::new(folder))),
                Err(err) => self.error(format!("open {path}: {err}")),
            },
            None => {}
        }
    }

    fn start_comparison(&mut self) {
        let Some(images) = self.view().as_any().downcast_ref::<ImagesView>() else {
            return;
        };
        let paths = images.marked_paths();
        if paths.len() < 2 {
            self.info("select at least two images to compare");
            return;
        }

        let batch = match self.service.create_batch(&paths) {
            Ok(b) => b,
            Err(err) => {
                self.error(err.to_string());
                return;
            }
        };
        if let Err(err) = self.engine.start_session(&batch.image_refs()) {
            self.error(err.to_string());
            return;
        }

        self.info(format!("comparing {} images ({})", batch.images.len(), batch.id));
        self.push_view(Box::new(CompareView::new(
            batch.id.clone(),
            Rc::clone(&self.compare_state),
            Arc::clone(&self.service),
            self.config.thumbnail_size,
        )));
        self.batch = Some(batch);
    }

    fn apply_compare(&mut self, cmd: CompareCommand) {
        // Persist only the first save of an image; repeats leave the set unchanged.
        let to_persist = match (cmd, self.engine.snapshot()) {
            (CompareCommand::SaveImage, Some(s)) if !s.saved.contains(&s.current_best) => {
                Some(s.current_best.clone())
            }
            _ => None,
        };

        match self.engine.apply(cmd) {
            Ok(Applied::Updated) => {
                self.status = None;
                if let Some(image) = to_persist {
                    self.persist(image.as_str());
                }
            }
            Ok(Applied::Exited(summary)) => {
                if self.view().as_any().is::<CompareView>() {
                    self.pop_view();
                }
                self.batch = None;
                self.info(format!(
                    "best: {}  saved {}  rejected {}  decisions {}",
                    summary.winner,
                    summary.saved.len(),
                    summary.rejected.len(),
                    summary.decisions
                ));
            }
            Err(err) => self.error(err.to_string()),
        }
    }

    fn persist(&mut self, path: &str) {
        let Some(batch) = &self.batch else {
            return;
        };
        let job = SaveJob {
            batch_id: batch.id.clone(),
            paths: vec![path.to_string()],
            target_folder: self.config.save_folder.clone(),
        };
        if !self.saves.enqueue(job) {
            self.error(format!("could not queue save of {path}"));
        }
    }
}
