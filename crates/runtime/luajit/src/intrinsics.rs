//! The intrinsics table and the chunk environment.

use std::rc::Rc;

use mlua::{Lua, Table, Value as LuaValue};
use rhizome_harness_core::{Equality, List, Value};
use tracing::trace;

use crate::marshal::{from_lua, inspect};
use crate::observer::Observer;
use crate::variant::LuaVariant;

/// Built-ins copied from the global table into the chunk environment.
const BUILTINS: &[&str] = &[
    "assert",
    "error",
    "ipairs",
    "next",
    "pairs",
    "pcall",
    "select",
    "setmetatable",
    "tonumber",
    "tostring",
    "type",
    "unpack",
    "xpcall",
    "string",
    "table",
    "math",
];

/// Build the environment table a chunk runs in: the whitelisted built-ins,
/// the `harness` intrinsics table, and `equal`.
pub(crate) fn environment(
    lua: &Lua,
    equality: Equality,
    observer: Rc<dyn Observer>,
) -> mlua::Result<Table> {
    let globals = lua.globals();
    let env = lua.create_table()?;
    for name in BUILTINS {
        let value: LuaValue = globals.get(*name)?;
        if !value.is_nil() {
            env.set(*name, value)?;
        }
    }

    let harness = lua.create_table()?;
    harness.set("split", lua.create_function(split)?)?;
    harness.set(
        "debug",
        lua.create_function(move |lua, item: LuaValue| {
            observer.debug(&render(lua, &item));
            Ok(item)
        })?,
    )?;

    let equal = lua.create_function(move |lua, args: Table| {
        let left = from_lua(lua, args.get(1)?).map_err(mlua::Error::external)?;
        let right = from_lua(lua, args.get(2)?).map_err(mlua::Error::external)?;
        let same = equality.holds(&left, &right);
        trace!(%left, %right, same, "equal");
        Ok(LuaVariant::Boolean(same))
    })?;
    harness.set("equal", equal.clone())?;

    env.set("harness", harness)?;
    env.set("equal", equal)?;
    Ok(env)
}

/// `harness.split({text, separator})`.
fn split(_: &Lua, args: Table) -> mlua::Result<LuaVariant> {
    let text: String = args.get(1)?;
    let separator: String = args.get(2)?;
    Ok(LuaVariant::List(Rc::new(split_text(&text, &separator))))
}

/// Split into a list of substrings. An empty separator splits into
/// characters.
pub(crate) fn split_text(text: &str, separator: &str) -> List {
    if separator.is_empty() {
        text.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        text.split(separator).map(Value::from).collect()
    }
}

/// Text shown for a `debug` argument. Closures are not called.
fn render(lua: &Lua, item: &LuaValue) -> String {
    match inspect(lua, item.clone()) {
        Ok(value) => value.to_string(),
        Err(_) => format!("<{}>", item.type_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(list: &List) -> Vec<&str> {
        list.iter().filter_map(Value::as_str).collect()
    }

    #[test]
    fn test_split_text() {
        assert_eq!(parts(&split_text("a,b,c", ",")), vec!["a", "b", "c"]);
        assert_eq!(parts(&split_text("a, b", ", ")), vec!["a", "b"]);
        assert_eq!(parts(&split_text("", ",")), vec![""]);
        assert_eq!(parts(&split_text("a,", ",")), vec!["a", ""]);
    }

    #[test]
    fn test_split_empty_separator() {
        assert_eq!(parts(&split_text("abc", "")), vec!["a", "b", "c"]);
        assert!(split_text("", "").is_empty());
    }
}
