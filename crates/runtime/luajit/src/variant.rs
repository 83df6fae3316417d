//! Variants at the Lua boundary.
//!
//! Generated code dispatches on booleans and lists by calling them with a
//! handler table: `xs({ Empty = function(u) ... end, Head = function(p) ... end })`.
//! Values produced on the Rust side cross as [`LuaVariant`] userdata with a
//! `__call` metamethod. Values built in Lua are plain closures; the probe
//! table finds out which branch such a closure picks.

use std::rc::Rc;

use mlua::{
    Function, Lua, MetaMethod, MultiValue, Table, UserData, UserDataMethods, Value as LuaValue,
};
use rhizome_harness_core::variant::check_handlers;
use rhizome_harness_core::{List, Tag, Value};

use crate::marshal::to_lua;

/// A boolean or list owned by Rust, callable from Lua with a handler table.
#[derive(Debug, Clone)]
pub enum LuaVariant {
    Boolean(bool),
    List(Rc<List>),
}

impl LuaVariant {
    /// Wrap a variant value. Returns `None` for records and primitives.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(b) => Some(LuaVariant::Boolean(*b)),
            Value::List(list) => Some(LuaVariant::List(list.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            LuaVariant::Boolean(b) => Value::Boolean(*b),
            LuaVariant::List(list) => Value::List(list.clone()),
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            LuaVariant::Boolean(b) => Tag::of_bool(*b),
            LuaVariant::List(list) => match **list {
                List::Empty => Tag::Empty,
                List::Head(..) => Tag::Head,
            },
        }
    }

    fn invoke(&self, lua: &Lua, handlers: Table) -> mlua::Result<MultiValue> {
        let tag = self.tag();
        check_handlers(tag, |name| {
            handlers
                .get::<LuaValue>(name)
                .is_ok_and(|branch| !branch.is_nil())
        })
        .map_err(mlua::Error::external)?;

        let branch: Function = handlers.get(tag.name())?;
        let payload = match self {
            LuaVariant::List(list) => match &**list {
                List::Head(head, rest) => lua.create_sequence_from([
                    to_lua(lua, head)?,
                    LuaValue::UserData(lua.create_userdata(LuaVariant::List(rest.clone()))?),
                ])?,
                List::Empty => lua.create_table()?,
            },
            LuaVariant::Boolean(_) => lua.create_table()?,
        };
        branch.call(payload)
    }
}

impl UserData for LuaVariant {
    fn add_methods<M: UserDataMethods<Self>>(methods: &mut M) {
        methods.add_meta_method(MetaMethod::Call, |lua, this, handlers: Table| {
            this.invoke(lua, handlers)
        });
        methods.add_meta_method(MetaMethod::ToString, |_, this, ()| {
            Ok(this.to_value().to_string())
        });
    }
}

/// Marker returned by a probe branch.
pub(crate) struct ProbeMark(pub(crate) Tag);

impl UserData for ProbeMark {}

/// A handler table with every branch. Each branch returns a [`ProbeMark`]
/// naming itself, followed by the payload it received.
pub(crate) fn probe_table(lua: &Lua) -> mlua::Result<Table> {
    let probe = lua.create_table()?;
    for tag in Tag::ALL {
        let branch =
            lua.create_function(move |_, payload: LuaValue| Ok((ProbeMark(tag), payload)))?;
        probe.set(tag.name(), branch)?;
    }
    Ok(probe)
}
