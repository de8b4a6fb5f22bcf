//! Node types, their start sequences and how each is parsed

use serde::Serialize;

/// How the lines of a node are consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStyle {
    /// One text line
    Leaf,
    /// One command line
    LoneCommand,
    /// One XML tag line whose attributes become parameters
    XmlLoneCommand,
    /// Children until a line starting with the ending, which is consumed
    Bounded(&'static str),
    /// Children until the ending, which is left for the parent
    Excluding(&'static str),
    /// An XML tag line, then children until the ending
    XmlBounded(&'static str),
    /// Parameter lines, then children until `\end_inset`
    Inset,
    /// Inline styling: children until a line whose first token is a live text ending
    /// or a paragraph end
    TextRun(&'static str),
    /// Everything up to and including the ending is skipped
    Dummy(&'static str),
    /// Raw formula lines until `\end_inset`
    Formula,
    /// Table XML parameters, then rows until `\end_inset`
    Table,
    /// `\key value` settings until `\end_header`
    Header,
}

pub const INSET_ENDING: &str = "\\end_inset";
pub const LAYOUT_ENDING: &str = "\\end_layout";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeType {
    Text,
    Hidden,
    Header,
    Body,
    Footer,
    Layout,
    StandardLayout,
    PlainLayout,
    ListItem,
    Description,
    CodeLayout,
    BibliographyLayout,
    Deeper,
    Align,
    Emphasis,
    Bold,
    Shape,
    Family,
    Versalitas,
    Size,
    Color,
    Strikeout,
    Underline,
    DoubleUnderline,
    Wave,
    ChangeInserted,
    ChangeDeleted,
    Newline,
    Newpage,
    Rule,
    Hfill,
    Appendix,
    Formula,
    Image,
    Float,
    Wrap,
    Caption,
    Footnote,
    MarginNote,
    Note,
    Table,
    Column,
    Row,
    Cell,
    InsetText,
    Ert,
    Quotes,
    Space,
    NewlineInset,
    NewpageInset,
    VSpace,
    Listing,
    BoxInset,
    Branch,
    Flex,
    FlexUrl,
    IndexEntry,
    ShortTitle,
    Info,
    Phantom,
    Label,
    Reference,
    Citation,
    BibItem,
    BibTeX,
    Url,
    TableOfContents,
    PrintIndex,
    Include,
    RuleInset,
    UnknownInset,
}

impl NodeType {
    pub fn parse_style(self) -> ParseStyle {
        use NodeType::*;
        match self {
            Text => ParseStyle::Leaf,
            Hidden | Align | Newline | Newpage | Rule | Hfill | Appendix => {
                ParseStyle::LoneCommand
            }
            Header => ParseStyle::Header,
            Body => ParseStyle::Excluding("\\end_body"),
            Footer => ParseStyle::Dummy("\\end_document"),
            Layout | StandardLayout | PlainLayout | ListItem | Description | CodeLayout
            | BibliographyLayout => ParseStyle::Bounded(LAYOUT_ENDING),
            Deeper => ParseStyle::Bounded("\\end_deeper"),
            Emphasis => ParseStyle::TextRun("\\emph"),
            Bold => ParseStyle::TextRun("\\series"),
            Shape => ParseStyle::TextRun("\\shape"),
            Family => ParseStyle::TextRun("\\family"),
            Versalitas => ParseStyle::TextRun("\\noun"),
            Size => ParseStyle::TextRun("\\size"),
            Color => ParseStyle::TextRun("\\color"),
            Strikeout => ParseStyle::TextRun("\\strikeout"),
            Underline => ParseStyle::TextRun("\\bar"),
            DoubleUnderline => ParseStyle::TextRun("\\uuline"),
            Wave => ParseStyle::TextRun("\\uwave"),
            ChangeInserted | ChangeDeleted => ParseStyle::TextRun("\\change_unchanged"),
            Formula => ParseStyle::Formula,
            Table => ParseStyle::Table,
            Column => ParseStyle::XmlLoneCommand,
            Row => ParseStyle::XmlBounded("</row"),
            Cell => ParseStyle::XmlBounded("</cell"),
            Image | Float | Wrap | Caption | Footnote | MarginNote | Note | InsetText | Ert
            | Quotes | Space | NewlineInset | NewpageInset | VSpace | Listing | BoxInset
            | Branch | Flex | FlexUrl | IndexEntry | ShortTitle | Info | Phantom | Label
            | Reference | Citation | BibItem | BibTeX | Url | TableOfContents | PrintIndex
            | Include | RuleInset | UnknownInset => ParseStyle::Inset,
        }
    }
}

/// Start sequences of the standard node types
///
/// The empty start is the catch-all: any line no other start matches is text.
pub const STARTS: &[(&str, NodeType)] = &[
    ("", NodeType::Text),
    ("#LyX", NodeType::Hidden),
    ("\\lyxformat", NodeType::Hidden),
    ("\\begin_document", NodeType::Hidden),
    ("\\end_document", NodeType::Hidden),
    ("\\begin_header", NodeType::Header),
    ("\\begin_body", NodeType::Body),
    ("\\end_body", NodeType::Footer),
    ("\\begin_layout", NodeType::Layout),
    ("\\begin_layout Standard", NodeType::StandardLayout),
    ("\\begin_layout Plain", NodeType::PlainLayout),
    ("\\begin_layout Itemize", NodeType::ListItem),
    ("\\begin_layout Enumerate", NodeType::ListItem),
    ("\\begin_layout Description", NodeType::Description),
    ("\\begin_layout LyX-Code", NodeType::CodeLayout),
    ("\\begin_layout Bibliography", NodeType::BibliographyLayout),
    ("\\begin_deeper", NodeType::Deeper),
    ("\\align", NodeType::Align),
    ("\\noindent", NodeType::Hidden),
    ("\\labelwidthstring", NodeType::Hidden),
    ("\\paragraph_spacing", NodeType::Hidden),
    ("\\leftindent", NodeType::Hidden),
    ("\\lang", NodeType::Hidden),
    ("\\emph on", NodeType::Emphasis),
    ("\\emph toggle", NodeType::Emphasis),
    ("\\emph default", NodeType::Hidden),
    ("\\emph off", NodeType::Hidden),
    ("\\series bold", NodeType::Bold),
    ("\\series default", NodeType::Hidden),
    ("\\series medium", NodeType::Hidden),
    ("\\shape", NodeType::Shape),
    ("\\shape default", NodeType::Hidden),
    ("\\shape up", NodeType::Hidden),
    ("\\family", NodeType::Family),
    ("\\family default", NodeType::Hidden),
    ("\\family roman", NodeType::Hidden),
    ("\\noun on", NodeType::Versalitas),
    ("\\noun default", NodeType::Hidden),
    ("\\noun off", NodeType::Hidden),
    ("\\size", NodeType::Size),
    ("\\size default", NodeType::Hidden),
    ("\\size normal", NodeType::Hidden),
    ("\\color", NodeType::Color),
    ("\\color inherit", NodeType::Hidden),
    ("\\color none", NodeType::Hidden),
    ("\\strikeout on", NodeType::Strikeout),
    ("\\strikeout default", NodeType::Hidden),
    ("\\strikeout off", NodeType::Hidden),
    ("\\bar under", NodeType::Underline),
    ("\\bar default", NodeType::Hidden),
    ("\\bar no", NodeType::Hidden),
    ("\\uuline on", NodeType::DoubleUnderline),
    ("\\uuline default", NodeType::Hidden),
    ("\\uuline off", NodeType::Hidden),
    ("\\uwave on", NodeType::Wave),
    ("\\uwave default", NodeType::Hidden),
    ("\\uwave off", NodeType::Hidden),
    ("\\change_inserted", NodeType::ChangeInserted),
    ("\\change_deleted", NodeType::ChangeDeleted),
    ("\\change_unchanged", NodeType::Hidden),
    ("\\newline", NodeType::Newline),
    ("\\newpage", NodeType::Newpage),
    ("\\lyxline", NodeType::Rule),
    ("\\hfill", NodeType::Hfill),
    ("\\start_of_appendix", NodeType::Appendix),
    ("\\begin_inset", NodeType::UnknownInset),
    ("\\begin_inset Formula", NodeType::Formula),
    ("\\begin_inset Graphics", NodeType::Image),
    ("\\begin_inset Float", NodeType::Float),
    ("\\begin_inset Wrap", NodeType::Wrap),
    ("\\begin_inset Caption", NodeType::Caption),
    ("\\begin_inset Foot", NodeType::Footnote),
    ("\\begin_inset Marginal", NodeType::MarginNote),
    ("\\begin_inset Note", NodeType::Note),
    ("\\begin_inset Tabular", NodeType::Table),
    ("\\begin_inset Text", NodeType::InsetText),
    ("\\begin_inset ERT", NodeType::Ert),
    ("\\begin_inset Quotes", NodeType::Quotes),
    ("\\begin_inset space", NodeType::Space),
    ("\\begin_inset Newline", NodeType::NewlineInset),
    ("\\begin_inset Newpage", NodeType::NewpageInset),
    ("\\begin_inset VSpace", NodeType::VSpace),
    ("\\begin_inset listings", NodeType::Listing),
    ("\\begin_inset Box", NodeType::BoxInset),
    ("\\begin_inset Branch", NodeType::Branch),
    ("\\begin_inset Flex", NodeType::Flex),
    ("\\begin_inset Flex URL", NodeType::FlexUrl),
    ("\\begin_inset Index", NodeType::IndexEntry),
    ("\\begin_inset Argument", NodeType::ShortTitle),
    ("\\begin_inset OptArg", NodeType::ShortTitle),
    ("\\begin_inset Info", NodeType::Info),
    ("\\begin_inset Phantom", NodeType::Phantom),
    ("\\begin_inset CommandInset label", NodeType::Label),
    ("\\begin_inset CommandInset ref", NodeType::Reference),
    ("\\begin_inset CommandInset citation", NodeType::Citation),
    ("\\begin_inset CommandInset bibitem", NodeType::BibItem),
    ("\\begin_inset CommandInset bibtex", NodeType::BibTeX),
    ("\\begin_inset CommandInset href", NodeType::Url),
    ("\\begin_inset CommandInset toc", NodeType::TableOfContents),
    ("\\begin_inset CommandInset index_print", NodeType::PrintIndex),
    ("\\begin_inset CommandInset include", NodeType::Include),
    ("\\begin_inset CommandInset line", NodeType::RuleInset),
    ("<lyxtabular", NodeType::Hidden),
    ("</lyxtabular", NodeType::Hidden),
    ("<features", NodeType::Hidden),
    ("<column", NodeType::Column),
    ("<row", NodeType::Row),
    ("<cell", NodeType::Cell),
];
