//! Built-in abbreviation table, state names, and pseudo-element names.
//!
//! Hosts can extend or override abbreviations on a [`Theme`](crate::types::Theme);
//! the state and pseudo-element lists decide how `name(...)` tokens dispatch.

use phf::{phf_map, phf_set};

/// Abbreviation → CSS property.
pub static STANDARD_ABBREVIATIONS: phf::Map<&'static str, &'static str> = phf_map! {
    // Box model
    "w" => "width",
    "h" => "height",
    "min-w" => "min-width",
    "max-w" => "max-width",
    "min-h" => "min-height",
    "max-h" => "max-height",
    "p" => "padding",
    "pt" => "padding-top",
    "pr" => "padding-right",
    "pb" => "padding-bottom",
    "pl" => "padding-left",
    "px" => "padding-inline",
    "py" => "padding-block",
    "m" => "margin",
    "mt" => "margin-top",
    "mr" => "margin-right",
    "mb" => "margin-bottom",
    "ml" => "margin-left",
    "mx" => "margin-inline",
    "my" => "margin-block",
    "bs" => "box-sizing",
    "ar" => "aspect-ratio",

    // Border & outline
    "bd" => "border",
    "bdt" => "border-top",
    "bdr" => "border-right",
    "bdb" => "border-bottom",
    "bdl" => "border-left",
    "bdw" => "border-width",
    "bds" => "border-style",
    "bdc" => "border-color",
    "br" => "border-radius",
    "ol" => "outline",
    "olw" => "outline-width",
    "olc" => "outline-color",
    "olo" => "outline-offset",

    // Colors & backgrounds
    "bg" => "background",
    "bgc" => "background-color",
    "bgi" => "background-image",
    "bgp" => "background-position",
    "bgs" => "background-size",
    "bgr" => "background-repeat",
    "bga" => "background-attachment",
    "c" => "color",
    "op" => "opacity",
    "sd" => "box-shadow",
    "fil" => "filter",
    "bf" => "backdrop-filter",
    "mbm" => "mix-blend-mode",

    // Typography
    "fs" => "font-size",
    "fw" => "font-weight",
    "fm" => "font-family",
    "fst" => "font-style",
    "lh" => "line-height",
    "ls" => "letter-spacing",
    "ta" => "text-align",
    "td" => "text-decoration",
    "tt" => "text-transform",
    "to" => "text-overflow",
    "ts" => "text-shadow",
    "ws" => "white-space",
    "wb" => "word-break",
    "va" => "vertical-align",

    // Layout
    "d" => "display",
    "pos" => "position",
    "t" => "top",
    "r" => "right",
    "b" => "bottom",
    "l" => "left",
    "z" => "z-index",
    "ov" => "overflow",
    "ovx" => "overflow-x",
    "ovy" => "overflow-y",
    "vis" => "visibility",
    "fl" => "float",
    "cl" => "clear",
    "obf" => "object-fit",
    "obp" => "object-position",

    // Flex & grid
    "fx" => "flex",
    "fd" => "flex-direction",
    "fwr" => "flex-wrap",
    "fg" => "flex-grow",
    "fsh" => "flex-shrink",
    "fb" => "flex-basis",
    "jc" => "justify-content",
    "ji" => "justify-items",
    "js" => "justify-self",
    "ai" => "align-items",
    "ac" => "align-content",
    "as" => "align-self",
    "gap" => "gap",
    "rg" => "row-gap",
    "cg" => "column-gap",
    "gtc" => "grid-template-columns",
    "gtr" => "grid-template-rows",
    "gc" => "grid-column",
    "gr" => "grid-row",
    "ord" => "order",

    // Motion & interaction
    "tsn" => "transition",
    "tf" => "transform",
    "an" => "animation",
    "cur" => "cursor",
    "pe" => "pointer-events",
    "us" => "user-select",
    "ct" => "content",
    "lst" => "list-style",
    "ap" => "appearance",

    // Container setup
    "ctn" => "container-type",
    "ctnn" => "container-name",
};

/// Names accepted as `state(...)` blocks, emitted as `.key:state`.
pub static KNOWN_STATES: phf::Set<&'static str> = phf_set! {
    "hover",
    "focus",
    "active",
    "visited",
    "focus-within",
    "focus-visible",
    "target",
    "disabled",
    "enabled",
    "checked",
    "indeterminate",
    "read-only",
    "read-write",
    "required",
    "optional",
    "valid",
    "invalid",
    "in-range",
    "out-of-range",
    "placeholder-shown",
    "default",
    "empty",
    "first-child",
    "last-child",
    "only-child",
    "first-of-type",
    "last-of-type",
    "only-of-type",
};

/// Names accepted as `pseudo(...)` blocks, emitted as `.key::pseudo`.
pub static SUPPORTED_PSEUDOS: phf::Set<&'static str> = phf_set! {
    "before",
    "after",
    "placeholder",
    "selection",
    "file-selector-button",
    "first-letter",
    "first-line",
    "marker",
    "backdrop",
    "spelling-error",
    "grammar-error",
};

pub fn is_known_state(name: &str) -> bool {
    KNOWN_STATES.contains(name)
}

pub fn is_supported_pseudo(name: &str) -> bool {
    SUPPORTED_PSEUDOS.contains(name)
}
