//! The user-agent ("master") stylesheet.
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that
//! presents elements of HTML documents in ways consistent with general
//! user expectations."
//!
//! Master rules enter the cascade before every author sheet, so any
//! author rule overrides them regardless of specificity (the sheets are
//! applied in order and later writes win at equal importance).

/// Default CSS applied to every document. Hosts may replace it at
/// document construction.
pub const MASTER_CSS: &str = r#"
/* Hidden elements */
area, base, basefont, datalist, head, link, meta, noembed,
noframes, param, rp, script, style, template, title {
    display: none;
}

/* Flow content */
address, article, aside, blockquote, body, center, dd, details,
dialog, dir, div, dl, dt, fieldset, figcaption, figure, footer,
form, h1, h2, h3, h4, h5, h6, header, hgroup, hr, html, legend,
listing, main, menu, nav, ol, p, plaintext, pre, search,
section, summary, ul, xmp {
    display: block;
}

body {
    margin: 8px;
    display: block;
}

/* Sections and headings */
h1 { font-size: 2em; font-weight: bold; margin: 0.67em 0; }
h2 { font-size: 1.5em; font-weight: bold; margin: 0.83em 0; }
h3 { font-size: 1.17em; font-weight: bold; margin: 1em 0; }
h4 { font-weight: bold; margin: 1.33em 0; }
h5 { font-size: 0.83em; font-weight: bold; margin: 1.67em 0; }
h6 { font-size: 0.67em; font-weight: bold; margin: 2.33em 0; }

/* Grouping content */
p, blockquote, figure, listing, plaintext, pre, xmp {
    margin-top: 1em;
    margin-bottom: 1em;
}

blockquote, figure { margin-left: 40px; margin-right: 40px; }

pre, listing, plaintext, xmp {
    font-family: monospace;
    white-space: pre;
}

hr {
    border: 1px inset;
    margin: 0.5em auto;
}

/* Lists */
li { display: list-item; }

ol, ul, menu, dir {
    margin-top: 1em;
    margin-bottom: 1em;
    padding-left: 40px;
}

ul, menu, dir { list-style-type: disc; }
ol { list-style-type: decimal; }
ol ul, ul ul, menu ul, dir ul { list-style-type: circle; }
dd { margin-left: 40px; }

/* Text-level semantics */

/* A break is an atomic zero-width box: the line builder refuses to
   hold it, which forces the line break. */
br { display: inline-block; }

b, strong { font-weight: bold; }
i, cite, em, var, dfn, address { font-style: italic; }
tt, code, kbd, samp { font-family: monospace; }
small { font-size: 0.83em; }
big { font-size: 1.17em; }
sub { vertical-align: sub; font-size: 0.83em; }
sup { vertical-align: super; font-size: 0.83em; }
u, ins { text-decoration: underline; }
s, strike, del { text-decoration: line-through; }

a:link {
    color: blue;
    text-decoration: underline;
    cursor: pointer;
}

/* Tables */
table {
    display: table;
    border-collapse: separate;
    border-spacing: 2px;
}

caption { display: table-caption; text-align: center; }
tr { display: table-row; vertical-align: middle; }
col { display: table-column; }
colgroup { display: table-column-group; }
tbody { display: table-row-group; vertical-align: middle; }
thead { display: table-header-group; vertical-align: middle; }
tfoot { display: table-footer-group; vertical-align: middle; }
td, th { display: table-cell; padding: 1px; }
th { font-weight: bold; text-align: center; }

/* Form controls */
input, textarea, select, button {
    display: inline-block;
    border: 2px inset;
    padding: 1px 2px;
}

button { padding: 1px 6px; }
"#;
