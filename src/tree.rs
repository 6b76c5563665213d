//! Text rendering of an image's folder tree

use crate::entry::Entry;
use crate::error::Result;
use crate::exec::Executor;
use crate::runner::Ndc;
use std::path::Path;

const INDENT: &str = "  ";

impl<E: Executor> Ndc<E> {
    /// Render the folder tree below `top` as indented text.
    ///
    /// Children appear in listing order, each directory followed by its own
    /// contents one level deeper.
    pub fn render_tree(&self, image: impl AsRef<Path>, top: &str, partition: u32) -> Result<String> {
        let image = image.as_ref();
        let mut out = String::new();
        out.push_str(if top.is_empty() { "/" } else { top });
        out.push('\n');

        let mut stack: Vec<(String, std::vec::IntoIter<Entry>)> =
            vec![(top.to_string(), self.children(image, top, partition)?.into_iter())];

        loop {
            let depth = stack.len();
            let Some((path, children)) = stack.last_mut() else {
                break;
            };
            let Some(entry) = children.next() else {
                stack.pop();
                continue;
            };

            out.push_str(&format!("{}{}\n", INDENT.repeat(depth), entry.name));

            if entry.is_directory(&self.config().directory_type) {
                let child = self.profile().join(path, &entry.name);
                let entries = self.children(image, &child, partition)?;
                stack.push((child, entries.into_iter()));
            }
        }

        Ok(out)
    }
}
