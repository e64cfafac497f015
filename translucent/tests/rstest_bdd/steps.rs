//! Step definitions for the translucency and access tier scenarios.

use anyhow::{Context, Result, anyhow, ensure};
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};
use test_helpers::Zoo;
use translucent::{ClassId, Receiver, TranslucentError};

use super::fixtures::ZooContext;

fn class_of(zoo: &Zoo, kind: &str) -> Result<ClassId> {
    match kind {
        "animal" => Ok(zoo.animal),
        "dog" => Ok(zoo.dog),
        "parrot" => Ok(zoo.parrot),
        other => Err(anyhow!("unknown sample class '{other}'")),
    }
}

fn call_on(
    zoo_context: &ZooContext,
    name: &str,
    method: &str,
    args: &[Value],
) -> Result<Result<Value, std::sync::Arc<TranslucentError>>> {
    zoo_context.with_zoo(|zoo, objects| {
        let object = objects
            .get_mut(name)
            .ok_or_else(|| anyhow!("no object named '{name}'"))?;
        Ok(zoo.rt.call(Receiver::from(object), method, args))
    })
}

#[given("the sample zoo")]
fn sample_zoo(zoo_context: &ZooContext) -> Result<()> {
    ensure!(zoo_context.zoo.is_empty(), "zoo already built");
    let zoo = Zoo::new().map_err(|err| anyhow!(err.to_string()))?;
    zoo_context.zoo.set(zoo);
    Ok(())
}

fn construct_named(zoo_context: &ZooContext, kind: &str, name: String) -> Result<()> {
    zoo_context.with_zoo(|zoo, objects| {
        let class = class_of(zoo, kind)?;
        let object = zoo
            .rt
            .construct(class, Value::Null)
            .map_err(|err| anyhow!(err.to_string()))?;
        objects.insert(name, object);
        Ok(())
    })
}

#[given("an animal named \"{name}\"")]
fn animal_named(zoo_context: &ZooContext, name: String) -> Result<()> {
    construct_named(zoo_context, "animal", name)
}

#[given("a {kind} named \"{name}\"")]
fn subclass_named(zoo_context: &ZooContext, kind: String, name: String) -> Result<()> {
    construct_named(zoo_context, &kind, name)
}

#[when("the {kind} class sets \"{attribute}\" to \"{value}\"")]
fn class_sets(zoo_context: &ZooContext, kind: String, attribute: String, value: String) -> Result<()> {
    zoo_context.with_zoo(|zoo, _| {
        let class = class_of(zoo, &kind)?;
        zoo.class_call(class, &attribute, &[json!(value)])
            .map_err(|err| anyhow!(err.to_string()))?;
        Ok(())
    })
}

#[when("\"{name}\" sets \"{attribute}\" to \"{value}\"")]
fn object_sets(zoo_context: &ZooContext, name: String, attribute: String, value: String) -> Result<()> {
    call_on(zoo_context, &name, &attribute, &[json!(value)])?
        .map_err(|err| anyhow!(err.to_string()))?;
    Ok(())
}

#[when("\"{name}\" calls \"{method}\" with \"{value}\"")]
fn object_calls(zoo_context: &ZooContext, name: String, method: String, value: String) -> Result<()> {
    object_sets(zoo_context, name, method, value)
}

#[when("the {kind} method \"{method}\" is removed")]
fn remove_method(zoo_context: &ZooContext, kind: String, method: String) -> Result<()> {
    zoo_context.with_zoo(|zoo, _| {
        let class = class_of(zoo, &kind)?;
        let removed = zoo
            .rt
            .remove_method(class, &method)
            .map_err(|err| anyhow!(err.to_string()))?;
        ensure!(removed.is_some(), "{kind} had no method '{method}'");
        Ok(())
    })
}

#[when("an {kind} is constructed with \"{attribute}\" set to \"{value}\"")]
fn construct_with(
    zoo_context: &ZooContext,
    kind: String,
    attribute: String,
    value: String,
) -> Result<()> {
    let outcome = zoo_context.with_zoo(|zoo, _| {
        let class = class_of(zoo, &kind)?;
        Ok(zoo.rt.construct(class, json!({ attribute: value })))
    })?;
    match outcome {
        Ok(_) => Err(anyhow!("construction unexpectedly succeeded")),
        Err(err) => {
            zoo_context.last_error.set(err.to_string());
            Ok(())
        }
    }
}

#[then("\"{name}\" reads \"{attribute}\" as \"{expected}\"")]
fn object_reads(
    zoo_context: &ZooContext,
    name: String,
    attribute: String,
    expected: String,
) -> Result<()> {
    let value = call_on(zoo_context, &name, &attribute, &[])?
        .map_err(|err| anyhow!(err.to_string()))?;
    ensure!(value == json!(expected), "{name}.{attribute} was {value}");
    Ok(())
}

#[then("calling \"{method}\" on \"{name}\" reads \"{expected}\"")]
fn calling_reads(zoo_context: &ZooContext, method: String, name: String, expected: String) -> Result<()> {
    object_reads(zoo_context, name, method, expected)
}

#[then("\"{name}\" holds {count:usize} \"{attribute}\"")]
fn object_holds(zoo_context: &ZooContext, name: String, count: usize, attribute: String) -> Result<()> {
    let value = call_on(zoo_context, &name, &attribute, &[])?
        .map_err(|err| anyhow!(err.to_string()))?;
    let len = value
        .as_array()
        .map(Vec::len)
        .with_context(|| format!("{name}.{attribute} is not a list: {value}"))?;
    ensure!(len == count, "{name}.{attribute} holds {len} items");
    Ok(())
}

#[then("\"{name}\" has its own \"{attribute}\"")]
fn has_own(zoo_context: &ZooContext, name: String, attribute: String) -> Result<()> {
    zoo_context.with_zoo(|_, objects| {
        let object = objects.get(&name).context("object exists")?;
        ensure!(object.has_own(&attribute), "{name} still reads {attribute} through");
        Ok(())
    })
}

#[then("\"{name}\" does not have its own \"{attribute}\"")]
fn is_translucent(zoo_context: &ZooContext, name: String, attribute: String) -> Result<()> {
    zoo_context.with_zoo(|_, objects| {
        let object = objects.get(&name).context("object exists")?;
        ensure!(object.is_translucent(&attribute), "{name} stores its own {attribute}");
        Ok(())
    })
}

#[then("calling \"{method}\" on \"{name}\" is a {tier} access violation")]
fn access_violation(zoo_context: &ZooContext, method: String, name: String, tier: String) -> Result<()> {
    let Err(err) = call_on(zoo_context, &name, &method, &[])? else {
        return Err(anyhow!("{method} was callable on {name}"));
    };
    ensure!(err.is_access_violation(), "unexpected error: {err}");
    ensure!(err.to_string().starts_with(&tier), "unexpected tier: {err}");
    Ok(())
}

#[then("the error mentions \"{text}\"")]
fn error_mentions(zoo_context: &ZooContext, text: String) -> Result<()> {
    let message = zoo_context
        .last_error
        .take()
        .context("an error was recorded")?;
    ensure!(message.contains(&text), "unexpected error: {message}");
    Ok(())
}
