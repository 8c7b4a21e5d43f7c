// Minnow - A single-pass compiler for a small imperative language
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Block parsing for the parser.
//!
//! A block opens a fresh block id, parses statements up to the closing
//! brace and then releases every local declared directly inside it with a
//! single combined stack release.

use super::helpers::ParserHelpers;
use super::statements::StatementParser;
use super::Parser;
use crate::codegen::Instruction;
use crate::context::LoopLabels;
use crate::error::CompileError;
use crate::lexer::{TokenCategory, TokenKind};
use log::debug;

/// Extension trait for block parsing.
pub trait BlockParser<'source> {
    /// Parse a braced block of statements.
    fn parse_block(&mut self, loop_labels: Option<&LoopLabels>) -> Result<(), CompileError>;

    /// Release the locals of a block that has ended.
    fn close_block(&mut self, block_id: &str);
}

impl<'source> BlockParser<'source> for Parser<'source> {
    fn parse_block(&mut self, loop_labels: Option<&LoopLabels>) -> Result<(), CompileError> {
        self.expect(TokenKind::LeftBrace, "expected '{' to open a block")?;
        let block_id = self.function.labels.make_block_id();
        self.context.block_locals.open(&block_id);

        while !self.check_category(TokenCategory::BlockEnd) {
            self.parse_statement(&block_id, loop_labels)?;
        }
        self.expect(TokenKind::RightBrace, "expected '}' to close the block")?;

        self.close_block(&block_id);
        Ok(())
    }

    fn close_block(&mut self, block_id: &str) {
        let mut released = 0;
        for name in self.context.block_locals.close(block_id) {
            if let Some(declaration) = self.context.declarations.remove(&name) {
                released += self.context.footprint(declaration.size);
            }
        }
        if released == 0 {
            return;
        }

        // A trailing return has already unwound the frame
        if !self.function.last_was_return {
            self.emit(Instruction::ReleaseStack(released));
        }
        self.function.release(released);
        debug!("closed block {} releasing {} bytes", block_id, released);
    }
}
