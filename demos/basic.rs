use std::collections::HashMap;
use tracing_subscriber::EnvFilter;
use user_defaults::{UserDefaults, Value};

fn main() -> Result<(), user_defaults::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    // lives in ./.userDefaultsStore
    let defaults = UserDefaults::standard();

    // writing
    defaults.put("a", 1)?;
    defaults.put("b", 2)?;
    defaults.synchronize();

    defaults.put("c", 3)?;
    defaults.synchronize();

    let array1 = vec![10, 20, 30, 40, 50];
    defaults.put("array1", array1.clone())?;
    defaults.synchronize();

    defaults.put("really?", true)?;
    defaults.synchronize();

    let mut m: HashMap<String, Value> = HashMap::new();
    m.insert("whatever1".into(), "value1".into());
    m.insert("whatever2".into(), 123.into());
    m.insert("whatever3".into(), 1_000_000_000_000_i64.into());
    m.insert("whatever4".into(), true.into());
    m.insert("whatever5".into(), array1.into());
    defaults.put("aMap", m)?;
    defaults.synchronize();

    // reading
    println!("Reading some values");
    for key in ["a", "b", "c", "array1", "really?", "aMap"] {
        println!("{key} = {:?}", defaults.get(key)?);
    }
    println!("array1 as array = {:?}", defaults.get_array("array1")?);
    println!("aMap.whatever1 = {:?}", defaults.get_map("aMap")?.get("whatever1"));

    println!();
    println!("Checking if store has values for keys");
    for key in ["a", "d", "randomkey", "aMap"] {
        println!("{key}?  {}", defaults.has(key));
    }

    // typed access reports mismatches instead of guessing
    if let Err(e) = defaults.get_int("really?") {
        println!("\nget_int(\"really?\") -> {e}");
    }
    Ok(())
}
