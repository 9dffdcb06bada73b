//! NEXUS format writer (for [ClassificationTree]s + [LanguageMap]).

use crate::io::utils::escape_label;
use crate::model::{ClassificationTree, LanguageMap};
use crate::newick::NewickStyle;
use crate::newick::writer::{estimate_newick_len, to_newick_with_capacity};
use crate::nexus::defs::{
    BLOCK_BEGIN, BLOCK_END, DEFAULT_TREE_NAME, DIMENSIONS, NEXUS_HEADER, NTAX, TAXA, TAXLABELS, TRANSLATE, TREE,
    TREES,
};
use std::io::{self, BufWriter, Write};

// =#========================================================================#=
// NEXUS WRITER
// =#========================================================================#=
/// Buffered writer for classification trees in NEXUS format.
///
/// # Format Structure
/// ```text
/// #NEXUS
/// Begin TAXA;
///     Dimensions ntax=3;
///     Taxlabels Czech Old_Church_Slavonic Polish;
/// End;
/// Begin TREES;
///     Translate
///         1 Czech,
///         2 Old_Church_Slavonic,
///         3 Polish
///     ;
///     tree grape_1 = ((1:1,3:1):0.5,2:1.5);
/// End;
/// ```
/// (indentation is written as tabs)
///
/// # Example
/// ```no_run
/// use grape::nexus::NexusWriter;
/// use std::fs::File;
/// # let (tree, languages): (grape::model::ClassificationTree, grape::model::LanguageMap) = todo!();
///
/// let file = File::create("classification.nex")?;
/// let mut writer = NexusWriter::new(file);
/// writer.write_nexus(&[tree], &languages)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct NexusWriter<W: Write> {
    bw: BufWriter<W>,
}

// ============================================================================
// API (public)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Creates a new NEXUS writer on top of `inner`.
    pub fn new(inner: W) -> NexusWriter<W> {
        NexusWriter {
            bw: BufWriter::new(inner),
        }
    }

    /// Writes a complete NEXUS file with the trees and their shared
    /// languages, using integer keys (1-indexed) in the TRANSLATE command.
    /// Trees are named `grape_1`, `grape_2`, ...
    ///
    /// # Errors
    /// Returns an I/O error if writing fails
    pub fn write_nexus(&mut self, trees: &[ClassificationTree], languages: &LanguageMap) -> io::Result<()> {
        self.header()?
            .taxa_block(languages)?
            .trees_block(trees, languages)?;
        self.bw.flush()
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> io::Result<W> {
        self.bw.into_inner().map_err(|e| e.into_error())
    }
}

// ============================================================================
// Nexus Block & Command Writing (private)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Writes the NEXUS file header ("#NEXUS"), returning itself for chaining.
    fn header(&mut self) -> io::Result<&mut Self> {
        self.write_all(NEXUS_HEADER)?.newline()
    }

    /// Writes the TAXA block with dimensions and language labels.
    fn taxa_block(&mut self, languages: &LanguageMap) -> io::Result<&mut Self> {
        // "Begin TAXA;"
        self.write_all(BLOCK_BEGIN)?.space()?.write_all(TAXA)?.semicolon_ln()?;

        // "\tDimensions ntax=n;"
        self.tab()?
            .write_all(DIMENSIONS)?
            .space()?
            .write_all(NTAX)?
            .equals()?
            .write_all(languages.num_languages().to_string().as_bytes())?
            .semicolon_ln()?;

        // "\tTaxlabels label ...;"
        self.tab()?.write_all(TAXLABELS)?;
        for label in languages.labels() {
            self.space()?.write_all(escape_label(label).as_bytes())?;
        }
        self.semicolon_ln()?;

        self.write_all(BLOCK_END)?.newline()
    }

    /// Writes the TREES block with TRANSLATE command and tree list.
    fn trees_block(&mut self, trees: &[ClassificationTree], languages: &LanguageMap) -> io::Result<&mut Self> {
        // "Begin TREES;"
        self.write_all(BLOCK_BEGIN)?.space()?.write_all(TREES)?.semicolon_ln()?;

        self.translate_cmd(languages)?
            .tree_cmd_list(trees, languages)?
            .write_all(BLOCK_END)?
            .newline()
    }

    /// Writes the TRANSLATE command mapping 1-based indices to labels.
    fn translate_cmd(&mut self, languages: &LanguageMap) -> io::Result<&mut Self> {
        self.tab()?.write_all(TRANSLATE)?.newline()?;

        let num_languages = languages.num_languages();
        for (index, label) in languages.labels().iter().enumerate() {
            // "\t\t(index + 1) escaped_label,"
            self.tab()?
                .tab()?
                .write_all((index + 1).to_string().as_bytes())?
                .space()?
                .write_all(escape_label(label).as_bytes())?;

            // No comma after last pair
            if index + 1 < num_languages {
                self.comma()?;
            }
            self.newline()?;
        }

        self.tab()?.semicolon_ln()
    }

    /// Writes one TREE command per tree in 1-indexed Newick format.
    fn tree_cmd_list(&mut self, trees: &[ClassificationTree], languages: &LanguageMap) -> io::Result<&mut Self> {
        let Some(first) = trees.first() else {
            return Ok(self);
        };
        let estimated_length = estimate_newick_len(NewickStyle::OneIndexed, first, languages);

        // "\ttree <name> = <Newick;>"
        for (i, tree) in trees.iter().enumerate() {
            let name = format!("{}_{}", DEFAULT_TREE_NAME, i + 1);
            let newick = to_newick_with_capacity(NewickStyle::OneIndexed, tree, languages, estimated_length);

            self.tab()?
                .write_all(TREE)?
                .space()?
                .write_all(name.as_bytes())?
                .space()?
                .equals()?
                .space()?
                .write_all(newick.as_bytes())?
                .newline()?;
        }

        Ok(self)
    }
}

// ============================================================================
// Little Helpers (private)
// ============================================================================
impl<W: Write> NexusWriter<W> {
    /// Appends a byte slice to the [BufWriter], returning itself for chaining.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<&mut Self> {
        self.bw.write_all(buf)?;
        Ok(self)
    }

    fn space(&mut self) -> io::Result<&mut Self> {
        self.write_all(b" ")
    }

    fn tab(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"\t")
    }

    fn newline(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"\n")
    }

    /// Appends a semicolon followed by a newline (";\n").
    fn semicolon_ln(&mut self) -> io::Result<&mut Self> {
        self.write_all(b";\n")
    }

    fn comma(&mut self) -> io::Result<&mut Self> {
        self.write_all(b",")
    }

    fn equals(&mut self) -> io::Result<&mut Self> {
        self.write_all(b"=")
    }
}
