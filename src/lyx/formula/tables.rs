//! Translation tables for the formula grammar

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Single characters with a fixed translation; whitespace is dropped
pub static SYMBOL_CHARS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (' ', ""),
        ('\n', ""),
        ('\t', ""),
        ('~', "\u{00a0}"),
        ('\'', "′"),
        ('+', " + "),
        ('-', " − "),
        ('=', " = "),
        ('<', " &lt; "),
        ('>', " &gt; "),
        ('*', "∗"),
        ('&', "&amp;"),
        ('(', "("),
        (')', ")"),
        ('[', "["),
        (']', "]"),
        ('|', "|"),
        ('/', "/"),
        ('.', "."),
        (',', ","),
        (';', ";"),
        (':', ":"),
        ('!', "!"),
        ('?', "?"),
        ('@', "@"),
        ('"', "&quot;"),
    ])
});

/// Commands that stand for a fixed piece of output
pub static SYMBOL_COMMANDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("\\\\", "<br/>"),
        ("\\,", "\u{2009}"),
        ("\\:", "\u{2005}"),
        ("\\;", "\u{2004}"),
        ("\\!", ""),
        ("\\ ", "\u{00a0}"),
        ("\\quad", "\u{2003}"),
        ("\\qquad", "\u{2003}\u{2003}"),
        ("\\{", "{"),
        ("\\}", "}"),
        ("\\|", "‖"),
        ("\\%", "%"),
        ("\\$", "$"),
        ("\\#", "#"),
        ("\\_", "_"),
        ("\\&", "&amp;"),
        ("\\left", ""),
        ("\\right", ""),
        ("\\big", ""),
        ("\\Big", ""),
        ("\\bigg", ""),
        ("\\Bigg", ""),
        ("\\displaystyle", ""),
        ("\\textstyle", ""),
        ("\\limits", ""),
        ("\\nonumber", ""),
        ("\\notag", ""),
        ("\\cdot", "⋅"),
        ("\\times", " × "),
        ("\\div", " ÷ "),
        ("\\pm", " ± "),
        ("\\mp", " ∓ "),
        ("\\ast", "∗"),
        ("\\star", "⋆"),
        ("\\circ", "∘"),
        ("\\bullet", "•"),
        ("\\oplus", " ⊕ "),
        ("\\otimes", " ⊗ "),
        ("\\leq", " ≤ "),
        ("\\le", " ≤ "),
        ("\\geq", " ≥ "),
        ("\\ge", " ≥ "),
        ("\\neq", " ≠ "),
        ("\\ne", " ≠ "),
        ("\\ll", " ≪ "),
        ("\\gg", " ≫ "),
        ("\\approx", " ≈ "),
        ("\\equiv", " ≡ "),
        ("\\sim", " ∼ "),
        ("\\simeq", " ≃ "),
        ("\\cong", " ≅ "),
        ("\\propto", " ∝ "),
        ("\\to", " → "),
        ("\\rightarrow", " → "),
        ("\\leftarrow", " ← "),
        ("\\gets", " ← "),
        ("\\leftrightarrow", " ↔ "),
        ("\\Rightarrow", " ⇒ "),
        ("\\Leftarrow", " ⇐ "),
        ("\\Leftrightarrow", " ⇔ "),
        ("\\implies", " ⇒ "),
        ("\\iff", " ⇔ "),
        ("\\mapsto", " ↦ "),
        ("\\in", " ∈ "),
        ("\\notin", " ∉ "),
        ("\\ni", " ∋ "),
        ("\\subset", " ⊂ "),
        ("\\subseteq", " ⊆ "),
        ("\\supset", " ⊃ "),
        ("\\supseteq", " ⊇ "),
        ("\\cup", " ∪ "),
        ("\\cap", " ∩ "),
        ("\\setminus", " ∖ "),
        ("\\land", " ∧ "),
        ("\\lor", " ∨ "),
        ("\\wedge", " ∧ "),
        ("\\vee", " ∨ "),
        ("\\neg", "¬"),
        ("\\lnot", "¬"),
        ("\\forall", "∀"),
        ("\\exists", "∃"),
        ("\\emptyset", "∅"),
        ("\\varnothing", "∅"),
        ("\\infty", "∞"),
        ("\\partial", "∂"),
        ("\\nabla", "∇"),
        ("\\sum", "<span class=\"bigsymbol\">∑</span>"),
        ("\\prod", "<span class=\"bigsymbol\">∏</span>"),
        ("\\coprod", "<span class=\"bigsymbol\">∐</span>"),
        ("\\int", "<span class=\"bigsymbol\">∫</span>"),
        ("\\iint", "<span class=\"bigsymbol\">∬</span>"),
        ("\\iiint", "<span class=\"bigsymbol\">∭</span>"),
        ("\\oint", "<span class=\"bigsymbol\">∮</span>"),
        ("\\bigcup", "<span class=\"bigsymbol\">⋃</span>"),
        ("\\bigcap", "<span class=\"bigsymbol\">⋂</span>"),
        ("\\ldots", "…"),
        ("\\dots", "…"),
        ("\\cdots", "⋯"),
        ("\\vdots", "⋮"),
        ("\\ddots", "⋱"),
        ("\\prime", "′"),
        ("\\langle", "⟨"),
        ("\\rangle", "⟩"),
        ("\\lbrace", "{"),
        ("\\rbrace", "}"),
        ("\\lfloor", "⌊"),
        ("\\rfloor", "⌋"),
        ("\\lceil", "⌈"),
        ("\\rceil", "⌉"),
        ("\\vert", "|"),
        ("\\Vert", "‖"),
        ("\\mid", " | "),
        ("\\parallel", " ∥ "),
        ("\\perp", " ⊥ "),
        ("\\angle", "∠"),
        ("\\degree", "°"),
        ("\\sin", "sin"),
        ("\\cos", "cos"),
        ("\\tan", "tan"),
        ("\\cot", "cot"),
        ("\\sec", "sec"),
        ("\\csc", "csc"),
        ("\\arcsin", "arcsin"),
        ("\\arccos", "arccos"),
        ("\\arctan", "arctan"),
        ("\\sinh", "sinh"),
        ("\\cosh", "cosh"),
        ("\\tanh", "tanh"),
        ("\\log", "log"),
        ("\\ln", "ln"),
        ("\\lg", "lg"),
        ("\\exp", "exp"),
        ("\\lim", "lim"),
        ("\\max", "max"),
        ("\\min", "min"),
        ("\\sup", "sup"),
        ("\\inf", "inf"),
        ("\\det", "det"),
        ("\\dim", "dim"),
        ("\\ker", "ker"),
        ("\\gcd", "gcd"),
        ("\\arg", "arg"),
        ("\\Pr", "Pr"),
    ])
});

/// Commands for letter-like symbols, italicized like letters
pub static ALPHA_COMMANDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("\\alpha", "α"),
        ("\\beta", "β"),
        ("\\gamma", "γ"),
        ("\\delta", "δ"),
        ("\\epsilon", "ϵ"),
        ("\\varepsilon", "ε"),
        ("\\zeta", "ζ"),
        ("\\eta", "η"),
        ("\\theta", "θ"),
        ("\\vartheta", "ϑ"),
        ("\\iota", "ι"),
        ("\\kappa", "κ"),
        ("\\lambda", "λ"),
        ("\\mu", "μ"),
        ("\\nu", "ν"),
        ("\\xi", "ξ"),
        ("\\pi", "π"),
        ("\\varpi", "ϖ"),
        ("\\rho", "ρ"),
        ("\\varrho", "ϱ"),
        ("\\sigma", "σ"),
        ("\\varsigma", "ς"),
        ("\\tau", "τ"),
        ("\\upsilon", "υ"),
        ("\\phi", "ϕ"),
        ("\\varphi", "φ"),
        ("\\chi", "χ"),
        ("\\psi", "ψ"),
        ("\\omega", "ω"),
        ("\\Gamma", "Γ"),
        ("\\Delta", "Δ"),
        ("\\Theta", "Θ"),
        ("\\Lambda", "Λ"),
        ("\\Xi", "Ξ"),
        ("\\Pi", "Π"),
        ("\\Sigma", "Σ"),
        ("\\Upsilon", "Υ"),
        ("\\Phi", "Φ"),
        ("\\Psi", "Ψ"),
        ("\\Omega", "Ω"),
        ("\\ell", "ℓ"),
        ("\\hbar", "ℏ"),
        ("\\imath", "ı"),
        ("\\jmath", "ȷ"),
        ("\\aleph", "ℵ"),
        ("\\wp", "℘"),
        ("\\Re", "ℜ"),
        ("\\Im", "ℑ"),
        ("\\aa", "å"),
        ("\\AA", "Å"),
        ("\\o", "ø"),
        ("\\O", "Ø"),
        ("\\ss", "ß"),
    ])
});

/// One-parameter styling commands whose parameter is formula content
pub static FONT_FUNCTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("\\mathrm", "span class=\"mathrm\""),
        ("\\mathbf", "b"),
        ("\\mathit", "i"),
        ("\\mathsf", "span class=\"mathsf\""),
        ("\\mathtt", "tt"),
        ("\\mathcal", "span class=\"scriptfont\""),
        ("\\mathscr", "span class=\"scriptfont\""),
        ("\\mathbb", "span class=\"blackboard\""),
        ("\\mathfrak", "span class=\"fraktur\""),
        ("\\boldsymbol", "b"),
        ("\\bm", "b"),
        ("\\mathring", "span class=\"mathring\""),
    ])
});

/// One-parameter styling commands whose parameter is plain text
pub static TEXT_FUNCTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("\\text", "span class=\"text\""),
        ("\\textrm", "span class=\"textrm\""),
        ("\\textit", "i"),
        ("\\textbf", "b"),
        ("\\textsf", "span class=\"textsf\""),
        ("\\texttt", "tt"),
        ("\\textnormal", "span class=\"textrm\""),
        ("\\mbox", "span class=\"mbox\""),
        ("\\hbox", "span class=\"mbox\""),
        ("\\operatorname", "span class=\"mathrm\""),
    ])
});

/// Accents drawn over their parameter
pub static DECORATING_FUNCTIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("\\hat", "^"),
        ("\\overline", "‾"),
        ("\\underline", "_"),
        ("\\widehat", "^"),
        ("\\bar", "¯"),
        ("\\vec", "→"),
        ("\\overrightarrow", "⟶"),
        ("\\overleftarrow", "⟵"),
        ("\\dot", "˙"),
        ("\\ddot", "¨"),
        ("\\tilde", "˜"),
        ("\\widetilde", "˜"),
        ("\\check", "ˇ"),
        ("\\breve", "˘"),
        ("\\acute", "´"),
        ("\\grave", "`"),
    ])
});

/// Two-parameter commands: outer tag, then the tag for each parameter
pub static TWO_PARAMETER_FUNCTIONS: Lazy<
    HashMap<&'static str, (&'static str, &'static str, &'static str)>,
> = Lazy::new(|| {
    HashMap::from([
        (
            "\\frac",
            (
                "span class=\"fraction\"",
                "span class=\"numerator\"",
                "span class=\"denominator\"",
            ),
        ),
        (
            "\\dfrac",
            (
                "span class=\"fullfraction\"",
                "span class=\"numerator\"",
                "span class=\"denominator\"",
            ),
        ),
        (
            "\\tfrac",
            (
                "span class=\"fraction\"",
                "span class=\"numerator\"",
                "span class=\"denominator\"",
            ),
        ),
        (
            "\\cfrac",
            (
                "span class=\"fullfraction\"",
                "span class=\"numerator\"",
                "span class=\"denominator\"",
            ),
        ),
        (
            "\\binom",
            (
                "span class=\"binomial\"",
                "span class=\"binomrow\"",
                "span class=\"binomrow\"",
            ),
        ),
        (
            "\\dbinom",
            (
                "span class=\"binomial\"",
                "span class=\"binomrow\"",
                "span class=\"binomrow\"",
            ),
        ),
        (
            "\\stackrel",
            (
                "span class=\"stackrel\"",
                "span class=\"upstackrel\"",
                "span class=\"downstackrel\"",
            ),
        ),
        (
            "\\overset",
            (
                "span class=\"stackrel\"",
                "span class=\"upstackrel\"",
                "span class=\"downstackrel\"",
            ),
        ),
        (
            "\\underset",
            (
                "span class=\"stackrel\"",
                "span class=\"downstackrel\"",
                "span class=\"upstackrel\"",
            ),
        ),
    ])
});

/// Array-like environments: column alignments (repeated), delimiters and class
pub struct EnvironmentTemplate {
    pub alignments: &'static str,
    pub left: &'static str,
    pub right: &'static str,
    pub class: &'static str,
}

pub static ENVIRONMENTS: Lazy<HashMap<&'static str, EnvironmentTemplate>> = Lazy::new(|| {
    let template = |alignments, left, right, class| EnvironmentTemplate {
        alignments,
        left,
        right,
        class,
    };
    HashMap::from([
        ("array", template("c", "", "", "array")),
        ("matrix", template("c", "", "", "matrix")),
        ("smallmatrix", template("c", "", "", "matrix")),
        ("pmatrix", template("c", "(", ")", "matrix")),
        ("bmatrix", template("c", "[", "]", "matrix")),
        ("Bmatrix", template("c", "{", "}", "matrix")),
        ("vmatrix", template("c", "|", "|", "matrix")),
        ("Vmatrix", template("c", "‖", "‖", "matrix")),
        ("cases", template("ll", "{", "", "cases")),
        ("aligned", template("rl", "", "", "align")),
        ("align", template("rl", "", "", "align")),
        ("alignat", template("rl", "", "", "align")),
        ("flalign", template("rl", "", "", "align")),
        ("split", template("rl", "", "", "align")),
        ("gather", template("c", "", "", "gather")),
        ("gathered", template("c", "", "", "gather")),
        ("multline", template("c", "", "", "gather")),
        ("eqnarray", template("rcl", "", "", "eqnarray")),
        ("equation", template("c", "", "", "equation")),
        ("subarray", template("c", "", "", "array")),
    ])
});
