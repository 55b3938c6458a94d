// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pretty printers for reporting information.

use std::{borrow::Cow, sync::Mutex};

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

lazy_static::lazy_static! {
    static ref WARNING_PRINTER: Mutex<TreePrinter> = Mutex::new(TreePrinter::default());
}

/// Info-level blocks of text under a bold title.
pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: TreePrinter,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: TreePrinter::default(),
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push_line(line);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push_block(block);
    }

    pub(crate) fn display(self) {
        log::info!("{}", console::style(self.title).bold());
        for line in self.blocks.lines() {
            log::info!("{line}");
        }
        log::info!("");
    }
}

#[derive(Default)]
struct TreePrinter {
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl TreePrinter {
    fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push(block);
    }

    fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Each line prefixed with the tree symbol for its position.
    fn lines(&self) -> Vec<String> {
        let num_blocks = self.blocks.len();
        let mut lines = vec![];
        for (i_block, block) in self.blocks.iter().enumerate() {
            let num_lines = block.len();
            for (i_line, line) in block.iter().enumerate() {
                let symbol = match (i_line, i_line + 1 == num_lines, i_block + 1 == num_blocks) {
                    (0, false, _) => VERTICAL_AND_RIGHT,
                    (0, _, false) => VERTICAL_AND_RIGHT,
                    (0, true, true) => UP_AND_RIGHT,
                    _ => VERTICAL,
                };
                lines.push(format!("{symbol} {line}"));
            }
        }
        lines
    }
}

pub(crate) trait Warn {
    fn warn(self);
}

impl Warn for &'static str {
    fn warn(self) {
        WARNING_PRINTER.lock().unwrap().push_line(self.into());
    }
}

impl Warn for String {
    fn warn(self) {
        WARNING_PRINTER.lock().unwrap().push_line(self.into());
    }
}

impl Warn for Cow<'static, str> {
    fn warn(self) {
        WARNING_PRINTER.lock().unwrap().push_line(self);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        WARNING_PRINTER.lock().unwrap().push_block(self);
    }
}

/// Print out any warnings that have been collected as CLI arguments have been
/// parsed and transforms initialised. The collected warnings are cleared.
pub(crate) fn display_warnings() {
    log::debug!("Displaying warnings");
    let mut printer = WARNING_PRINTER.lock().unwrap();
    if printer.is_empty() {
        return;
    }

    log::warn!("{}", console::style("Warnings").bold());
    for line in printer.lines() {
        log::warn!("{line}");
    }
    log::warn!("");
    printer.blocks.clear();
}
