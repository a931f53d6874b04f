// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pretty printers for reporting information and deferred warnings.

use std::{borrow::Cow, sync::Mutex};

use log::Level;

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

type Block = Vec<Cow<'static, str>>;

lazy_static::lazy_static! {
    static ref WARNINGS: Mutex<Vec<Block>> = Mutex::new(vec![]);
}

/// Log a bold title, then each block of lines as a branch of a tree.
fn draw_tree(level: Level, title: &str, blocks: &[Block]) {
    log::log!(level, "{}", console::style(title).bold());
    let num_blocks = blocks.len();
    for (i_block, block) in blocks.iter().enumerate() {
        let last_block = i_block + 1 == num_blocks;
        for (i_line, line) in block.iter().enumerate() {
            let symbol = match (i_line, last_block && i_line + 1 == block.len()) {
                (0, true) => UP_AND_RIGHT,
                (0, false) => VERTICAL_AND_RIGHT,
                _ => VERTICAL,
            };
            log::log!(level, "{symbol} {line}");
        }
    }
    log::log!(level, "");
}

/// Groups of related lines printed under a title at the info level.
pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Block>,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push(block);
    }

    pub(crate) fn display(self) {
        draw_tree(Level::Info, &self.title, &self.blocks);
    }
}

/// Something that can be queued up as a warning, to be shown by
/// [`display_warnings`].
pub(crate) trait Warn {
    fn warn(self);
}

fn push_warning(block: Block) {
    // Poisoning doesn't invalidate queued warnings.
    let mut warnings = WARNINGS.lock().unwrap_or_else(|e| e.into_inner());
    warnings.push(block);
}

impl Warn for &'static str {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for String {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for Cow<'static, str> {
    fn warn(self) {
        push_warning(vec![self]);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        push_warning(self);
    }
}

impl<const N: usize> Warn for [Cow<'static, str>; N] {
    fn warn(self) {
        push_warning(self.to_vec());
    }
}

/// Print out any warnings that have been collected as CLI arguments have been
/// parsed, then forget them. This should be called once, after all arguments
/// have been parsed into parameters.
pub(crate) fn display_warnings() {
    log::debug!("Displaying warnings");
    let blocks: Vec<Block> = {
        let mut warnings = WARNINGS.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *warnings)
    };
    if blocks.is_empty() {
        return;
    }
    draw_tree(Level::Warn, "Warnings", &blocks);
}

