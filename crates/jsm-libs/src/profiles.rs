//! Capability profiles for the modes.
//!
//! JS mode promises the documented JavaScript surface; host-native mode
//! promises the absence of browser, DOM, filesystem and process APIs.

use jsm_surface::{CapabilityProfile, Mode};

/// Array members JS mode must provide.
pub const JS_ARRAY_MEMBERS: &[&str] = &[
    "length",
    "push",
    "pop",
    "shift",
    "unshift",
    "slice",
    "splice",
    "indexOf",
    "lastIndexOf",
    "every",
    "some",
    "forEach",
    "map",
    "filter",
    "reduce",
    "find",
    "findIndex",
    "includes",
    "sort",
    "reverse",
    "concat",
    "join",
    "at",
    "flat",
    "flatMap",
];

const JS_STRING_MEMBERS: &[&str] = &[
    "length",
    "charAt",
    "charCodeAt",
    "indexOf",
    "lastIndexOf",
    "includes",
    "startsWith",
    "endsWith",
    "slice",
    "substring",
    "split",
    "replace",
    "search",
    "match",
    "toLowerCase",
    "toUpperCase",
    "trim",
    "padStart",
    "padEnd",
    "repeat",
    "at",
];

const JS_GLOBALS: &[&str] = &[
    "Array",
    "String",
    "Number",
    "Boolean",
    "Object",
    "Function",
    "RegExp",
    "Math",
    "JSON",
    "console",
    "Error",
    "TypeError",
    "RangeError",
    "Map",
    "Set",
    "setTimeout",
    "clearTimeout",
    "setInterval",
    "clearInterval",
    "parseInt",
    "parseFloat",
    "isNaN",
    "isFinite",
];

/// Names host-native mode must neither declare nor expose through any type.
pub const HOST_NATIVE_EXCLUSIONS: &[&str] = &[
    // DOM
    "window",
    "Window",
    "document",
    "Document",
    "navigator",
    "location",
    "Element",
    "HTMLElement",
    "Event",
    "EventTarget",
    "localStorage",
    "sessionStorage",
    // Browser networking
    "fetch",
    "XMLHttpRequest",
    "WebSocket",
    "Request",
    "Response",
    "Headers",
    // Filesystem and process
    "require",
    "module",
    "exports",
    "process",
    "Buffer",
    "__dirname",
    "__filename",
    "fs",
    "NodeJS",
];

/// The profile `mode` is validated against.
pub fn profile_for(mode: Mode) -> CapabilityProfile {
    match mode {
        Mode::Js => CapabilityProfile::new(mode)
            .require_members("Array", JS_ARRAY_MEMBERS)
            .require_members("ArrayConstructor", &["isArray", "from", "of"])
            .require_members("String", JS_STRING_MEMBERS)
            .require_members("Number", &["toFixed", "toString"])
            .require_members("NumberConstructor", &["isInteger", "isNaN", "MAX_SAFE_INTEGER"])
            .require_members("ObjectConstructor", &["keys", "values", "entries", "assign", "freeze", "create"])
            .require_members("Function", &["apply", "call", "bind"])
            .require_members("RegExp", &["exec", "test", "lastIndex", "source"])
            .require_members("Math", &["abs", "floor", "ceil", "round", "min", "max", "random", "sqrt", "pow"])
            .require_members("JSON", &["parse", "stringify"])
            .require_members("Console", &["log", "error", "warn"])
            .require_members("Error", &["name", "message"])
            .require_members("Map", &["get", "set", "has", "delete", "clear", "forEach", "size"])
            .require_members("Set", &["add", "has", "delete", "clear", "forEach", "size"])
            .require_globals(JS_GLOBALS),
        Mode::HostNative => CapabilityProfile::new(mode).exclude(HOST_NATIVE_EXCLUSIONS.iter().copied()),
        _ => CapabilityProfile::new(mode),
    }
}
