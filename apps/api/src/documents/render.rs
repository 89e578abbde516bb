//! PDF and DOCX rendering of resumes and cover letters.
//!
//! Text is first laid out as a flat list of [`Block`]s, then written by the
//! format backend. Letters are detected by their salutation.

use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use thiserror::Error;

use resumecraft_profile::models::{DownloadFormat, Profile};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("DOCX rendering failed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn detect(content: &str) -> Self {
        let lower = content.trim().to_lowercase();
        if lower.starts_with("dear") || lower.contains("dear hiring manager") {
            DocumentKind::CoverLetter
        } else {
            DocumentKind::Resume
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Title(String),
    Heading(String),
    Body(String),
    Bullet(String),
    Spacer,
}

const EMPTY_EXPERIENCE: &str = "Experience details not available.";

/// Resume layout: contact header from the profile, then education,
/// the experience text (blank-line separated blocks, first line as the
/// entry header) and skills.
pub fn resume_blocks(profile: &Profile, content: &str) -> Vec<Block> {
    let mut blocks = vec![
        Block::Title(profile.name.clone()),
        Block::Body(format!(
            "{} | {} | {}",
            profile.email, profile.phone, profile.linkedin
        )),
        Block::Spacer,
        Block::Heading("Education".to_string()),
    ];

    for edu in &profile.education {
        blocks.push(Block::Body(format!(
            "{} in {} - {} ({} to {})",
            edu.degree,
            edu.field,
            edu.institution,
            edu.start_date,
            edu.end_date.as_deref().unwrap_or("Present")
        )));
        if let Some(description) = &edu.description {
            blocks.extend(
                description
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(|line| Block::Bullet(line.to_string())),
            );
        }
    }

    blocks.push(Block::Heading("Experience".to_string()));
    let content = if content.trim().is_empty() {
        EMPTY_EXPERIENCE
    } else {
        content
    };
    for entry in content.split("\n\n") {
        let mut lines = entry.trim().lines().map(str::trim).filter(|l| !l.is_empty());
        if let Some(header) = lines.next() {
            blocks.push(Block::Body(header.to_string()));
        }
        blocks.extend(lines.map(|line| Block::Bullet(strip_marker(line).to_string())));
    }

    blocks.push(Block::Heading("Skills".to_string()));
    blocks.push(Block::Body(profile.skills.join(", ")));
    blocks
}

/// Letter layout: one paragraph per line, blank lines kept as spacing.
pub fn cover_letter_blocks(content: &str) -> Vec<Block> {
    content
        .trim()
        .lines()
        .map(str::trim)
        .map(|line| {
            if line.is_empty() {
                Block::Spacer
            } else {
                Block::Body(line.to_string())
            }
        })
        .collect()
}

fn strip_marker(line: &str) -> &str {
    line.trim_start_matches(['•', '-', '*']).trim_start()
}

/// Lays out `content` for its detected kind and renders it in `format`.
pub fn render(
    profile: &Profile,
    content: &str,
    title: &str,
    format: DownloadFormat,
) -> Result<Vec<u8>, RenderError> {
    let blocks = match DocumentKind::detect(content) {
        DocumentKind::Resume => resume_blocks(profile, content),
        DocumentKind::CoverLetter => cover_letter_blocks(content),
    };
    match format {
        DownloadFormat::Pdf => render_pdf(title, &blocks),
        DownloadFormat::Docx => render_docx(&blocks),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PDF
// ────────────────────────────────────────────────────────────────────────────

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const PT_TO_MM: f32 = 0.3528;
/// Average Times glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, RenderError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::TimesRoman)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::TimesBold)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            font,
            bold,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn advance(&mut self, height: f32) {
        if self.y - height < MARGIN {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= height;
    }

    fn text(&mut self, text: &str, size: f32, indent: f32, bold: bool, centered: bool) {
        let line_height = size * PT_TO_MM * 1.35;
        let width = PAGE_WIDTH - 2.0 * MARGIN - indent;
        let max_chars = (width / (size * PT_TO_MM * GLYPH_WIDTH)) as usize;
        for line in wrap(&pdf_safe(text), max_chars) {
            self.advance(line_height);
            let x = if centered {
                let line_width = line.chars().count() as f32 * size * PT_TO_MM * GLYPH_WIDTH;
                ((PAGE_WIDTH - line_width) / 2.0).max(MARGIN)
            } else {
                MARGIN + indent
            };
            let font = if bold { &self.bold } else { &self.font };
            self.layer.use_text(line, size, Mm(x), Mm(self.y), font);
        }
    }

    fn finish(self) -> Result<Vec<u8>, RenderError> {
        self.doc
            .save_to_bytes()
            .map_err(|e| RenderError::Pdf(e.to_string()))
    }
}

fn render_pdf(title: &str, blocks: &[Block]) -> Result<Vec<u8>, RenderError> {
    let mut pdf = PdfWriter::new(title)?;
    for block in blocks {
        match block {
            Block::Title(text) => pdf.text(text, 18.0, 0.0, true, true),
            Block::Heading(text) => {
                pdf.advance(3.0);
                pdf.text(text, 14.0, 0.0, true, false);
            }
            Block::Body(text) => pdf.text(text, 11.0, 0.0, false, false),
            Block::Bullet(text) => pdf.text(&format!("- {text}"), 11.0, 4.0, false, false),
            Block::Spacer => pdf.advance(4.0),
        }
    }
    pdf.finish()
}

/// Greedy word wrap on character counts. Words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if len > 0 {
                lines.push(std::mem::take(&mut current));
                len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word_len = word.len();
        if len > 0 && len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            len = 0;
        }
        if len > 0 {
            current.push(' ');
            len += 1;
        }
        current.extend(word);
        len += word_len;
    }
    if len > 0 {
        lines.push(current);
    }
    lines
}

/// Builtin PDF fonts only cover Latin-1; common typographic characters are
/// mapped to ASCII and anything else outside Latin-1 becomes `?`.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '•' | '–' | '—' => '-',
            '‘' | '’' => '\'',
            '“' | '”' => '"',
            c if (c as u32) < 0x100 => c,
            _ => '?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// DOCX
// ────────────────────────────────────────────────────────────────────────────

fn render_docx(blocks: &[Block]) -> Result<Vec<u8>, RenderError> {
    let docx = blocks.iter().fold(Docx::new(), |docx, block| {
        let paragraph = match block {
            Block::Title(text) => Paragraph::new()
                .add_run(Run::new().add_text(text.as_str()).bold().size(36))
                .align(AlignmentType::Center),
            Block::Heading(text) => {
                Paragraph::new().add_run(Run::new().add_text(text.as_str()).bold().size(28))
            }
            Block::Body(text) => Paragraph::new().add_run(Run::new().add_text(text.as_str()).size(24)),
            Block::Bullet(text) => {
                Paragraph::new().add_run(Run::new().add_text(format!("• {text}")).size(24))
            }
            Block::Spacer => Paragraph::new(),
        };
        docx.add_paragraph(paragraph)
    });

    let mut buffer = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buffer)
        .map_err(|e| RenderError::Docx(e.to_string()))?;
    Ok(buffer.into_inner())
}
