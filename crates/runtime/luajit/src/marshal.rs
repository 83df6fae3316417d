//! Conversion between Lua values and [`Value`].

use std::rc::Rc;

use mlua::{Lua, Table, Value as LuaValue};
use rhizome_harness_core::{List, MarshalError, Record, Tag, Value};

use crate::variant::{probe_table, LuaVariant, ProbeMark};

/// Push a value into Lua. Booleans and lists become callable variants.
pub fn to_lua(lua: &Lua, value: &Value) -> mlua::Result<LuaValue> {
    Ok(match value {
        Value::Boolean(b) => LuaValue::UserData(lua.create_userdata(LuaVariant::Boolean(*b))?),
        Value::List(list) => LuaValue::UserData(lua.create_userdata(LuaVariant::List(list.clone()))?),
        Value::Record(record) => {
            let table = lua.create_table()?;
            for (key, field) in record.iter() {
                table.set(key, to_lua(lua, field)?)?;
            }
            LuaValue::Table(table)
        }
        Value::String(s) => LuaValue::String(lua.create_string(s)?),
        Value::Number(n) => LuaValue::Number(*n),
    })
}

/// Read a Lua value back into the canonical encoding.
///
/// Closures are treated as variants and invoked with a probe handler table
/// to learn their branch. Record keys come out sorted, since Lua tables
/// have no order.
pub fn from_lua(lua: &Lua, value: LuaValue) -> Result<Value, MarshalError> {
    Reader::new(lua, true).read(value)
}

/// Like [`from_lua`], but never calls into Lua. Closures are rejected.
pub(crate) fn inspect(lua: &Lua, value: LuaValue) -> Result<Value, MarshalError> {
    Reader::new(lua, false).read(value)
}

/// A variant after one step of inspection.
enum Opened {
    Native(LuaVariant),
    Boolean(bool),
    Empty,
    Head(LuaValue, LuaValue),
}

struct Reader<'a> {
    lua: &'a Lua,
    call_closures: bool,
    probe: Option<Table>,
}

impl<'a> Reader<'a> {
    fn new(lua: &'a Lua, call_closures: bool) -> Self {
        Self {
            lua,
            call_closures,
            probe: None,
        }
    }

    fn read(&mut self, value: LuaValue) -> Result<Value, MarshalError> {
        match value {
            LuaValue::Boolean(b) => Ok(Value::Boolean(b)),
            LuaValue::Integer(i) => Ok(Value::Number(i as f64)),
            LuaValue::Number(n) => Ok(Value::Number(n)),
            LuaValue::String(s) => Ok(Value::String(lua_string(&s)?)),
            LuaValue::Table(table) => self.record(table),
            LuaValue::UserData(_) | LuaValue::Function(_) => self.variant(value),
            other => Err(MarshalError::Unrepresentable(other.type_name().to_string())),
        }
    }

    fn record(&mut self, table: Table) -> Result<Value, MarshalError> {
        let mut fields = Vec::new();
        for pair in table.pairs::<LuaValue, LuaValue>() {
            let (key, field) = pair.map_err(|e| MarshalError::Unrepresentable(e.to_string()))?;
            let key = match key {
                LuaValue::String(s) => lua_string(&s)?,
                other => return Err(MarshalError::RecordKey(other.type_name().to_string())),
            };
            fields.push((key, self.read(field)?));
        }
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Value::Record(fields.into_iter().collect::<Record>()))
    }

    /// Walk a variant. List spines are followed iteratively.
    fn variant(&mut self, value: LuaValue) -> Result<Value, MarshalError> {
        let mut items = Vec::new();
        let mut cursor = value;
        loop {
            let opened = match self.open(cursor) {
                Err(MarshalError::NotAVariant(_)) if !items.is_empty() => {
                    return Err(MarshalError::ImproperList);
                }
                opened => opened?,
            };
            match opened {
                Opened::Native(LuaVariant::List(tail)) => {
                    return Ok(Value::List(List::prepend_all(items, tail)));
                }
                Opened::Native(LuaVariant::Boolean(b)) | Opened::Boolean(b) => {
                    return if items.is_empty() {
                        Ok(Value::Boolean(b))
                    } else {
                        Err(MarshalError::ImproperList)
                    };
                }
                Opened::Empty => {
                    return Ok(Value::List(List::prepend_all(items, Rc::new(List::Empty))));
                }
                Opened::Head(head, rest) => {
                    items.push(self.read(head)?);
                    cursor = rest;
                }
            }
        }
    }

    fn open(&mut self, value: LuaValue) -> Result<Opened, MarshalError> {
        match value {
            LuaValue::UserData(ud) => {
                let variant = ud
                    .borrow::<LuaVariant>()
                    .map(|variant| LuaVariant::clone(&variant))
                    .map_err(|_| MarshalError::NotAVariant("userdata".to_string()))?;
                Ok(Opened::Native(variant))
            }
            LuaValue::Function(f) if self.call_closures => {
                let probe = self.probe()?;
                let (mark, payload): (LuaValue, LuaValue) = f
                    .call(probe)
                    .map_err(|e| MarshalError::NotAVariant(e.to_string()))?;
                let tag = match mark {
                    LuaValue::UserData(ud) => ud
                        .borrow::<ProbeMark>()
                        .map(|mark| mark.0)
                        .map_err(|_| MarshalError::NotAVariant("function".to_string()))?,
                    _ => {
                        return Err(MarshalError::NotAVariant(
                            "function did not select a branch".to_string(),
                        ));
                    }
                };
                Ok(match tag {
                    Tag::True => Opened::Boolean(true),
                    Tag::False => Opened::Boolean(false),
                    Tag::Empty => Opened::Empty,
                    Tag::Head => {
                        let pair = match payload {
                            LuaValue::Table(pair) => pair,
                            other => {
                                return Err(MarshalError::Shape {
                                    expected: "{element, rest}",
                                    got: other.type_name(),
                                });
                            }
                        };
                        let element = pair
                            .get::<LuaValue>(1)
                            .map_err(|e| MarshalError::Unrepresentable(e.to_string()))?;
                        let rest = pair
                            .get::<LuaValue>(2)
                            .map_err(|e| MarshalError::Unrepresentable(e.to_string()))?;
                        Opened::Head(element, rest)
                    }
                })
            }
            other => Err(MarshalError::NotAVariant(other.type_name().to_string())),
        }
    }

    fn probe(&mut self) -> Result<Table, MarshalError> {
        if let Some(probe) = &self.probe {
            return Ok(probe.clone());
        }
        let probe =
            probe_table(self.lua).map_err(|e| MarshalError::Unrepresentable(e.to_string()))?;
        self.probe = Some(probe.clone());
        Ok(probe)
    }
}

fn lua_string(s: &mlua::String) -> Result<String, MarshalError> {
    s.to_str()
        .map(|s| s.to_string())
        .map_err(|e| MarshalError::Unrepresentable(format!("string: {e}")))
}
