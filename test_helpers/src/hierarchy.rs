//! A small class hierarchy exercising every attribute flavour.
//!
//! - `Zoo::Animal` declares public, protected, private, class-scoped, list
//!   and map attributes, plus user methods that touch its private attribute.
//! - `Zoo::Dog` inherits `Animal` and adds methods probing the access tiers
//!   from a subclass.
//! - `Zoo::Parrot` defines its own `sound` method before binding, so the
//!   generated `sound` accessor is only reachable as a fallback.

use serde_json::{Value, json};
use translucent::{ClassId, ClassSpec, Receiver, Runtime, TranslucentResult};

/// Class name of the root animal class.
pub const ANIMAL: &str = "Zoo::Animal";
/// Class name of the dog subclass.
pub const DOG: &str = "Zoo::Dog";
/// Class name of the parrot subclass.
pub const PARROT: &str = "Zoo::Parrot";

/// Attribute template of `Zoo::Animal`.
#[must_use]
pub fn animal_template() -> Value {
    json!({
        "sound": "...",
        "Legs": 4,
        "tricks": [],
        "traits": {},
        "_mood": "calm",
        "__secret": "none",
        "Census": [],
    })
}

/// The runtime and the identifiers of the sample classes.
#[derive(Debug)]
pub struct Zoo {
    /// Runtime owning the classes.
    pub rt: Runtime,
    /// `Zoo::Animal`.
    pub animal: ClassId,
    /// `Zoo::Dog`.
    pub dog: ClassId,
    /// `Zoo::Parrot`.
    pub parrot: ClassId,
}

impl Zoo {
    /// Build the hierarchy in `rt`.
    ///
    /// `Animal` and `Dog` are bound eagerly; `Parrot` binds on first
    /// construction from its conventional class value.
    ///
    /// # Errors
    ///
    /// Propagates any class definition or binding failure.
    pub fn build(mut rt: Runtime) -> TranslucentResult<Self> {
        let animal = rt.define_class(
            ClassSpec::new(ANIMAL)
                .template(animal_template())
                .method("revealSecret", |rt, mut this, _args| {
                    rt.call(this.reborrow(), "__secret", &[])
                })
                .method("hideSecret", |rt, mut this, args| {
                    rt.call(this.reborrow(), "__secret", args)
                }),
        )?;
        let dog = rt.define_class(
            ClassSpec::new(DOG)
                .parent(animal)
                .template(json!({}))
                .method("peekSecret", |rt, mut this, _args| {
                    rt.call(this.reborrow(), "__secret", &[])
                })
                .method("mood", |rt, mut this, args| {
                    rt.call(this.reborrow(), "_mood", args)
                }),
        )?;
        let parrot = rt.define_class(
            ClassSpec::new(PARROT)
                .parent(animal)
                .class_value("Parrot", json!({"sound": "squawk", "words": []}))
                .method("sound", |rt, mut this, args| {
                    let generated = rt.call_default(this.reborrow(), "sound", args)?;
                    Ok(match generated {
                        Value::String(text) => Value::String(format!("{text}!")),
                        other => other,
                    })
                }),
        )?;
        Ok(Self {
            rt,
            animal,
            dog,
            parrot,
        })
    }

    /// Build the hierarchy in a default runtime.
    ///
    /// # Errors
    ///
    /// As for [`Self::build`].
    pub fn new() -> TranslucentResult<Self> {
        Self::build(Runtime::new())
    }

    /// Call `method` on the class `class`.
    ///
    /// # Errors
    ///
    /// Propagates dispatch failures.
    pub fn class_call(
        &mut self,
        class: ClassId,
        method: &str,
        args: &[Value],
    ) -> TranslucentResult<Value> {
        self.rt.call(Receiver::Class(class), method, args)
    }
}
