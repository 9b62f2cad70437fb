use std::time::Duration;
use user_defaults::{DefaultBackend, SyncPolicy, UserDefaults};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir();
    let path = dir.join("user_defaults_example_builder.json");

    // pretty-printed JSON, written in the background every 5 seconds and
    // shortly after each change
    let prefs = UserDefaults::<DefaultBackend>::builder(&path)
        .pretty(true)
        .storage_name("exampleDefaults")
        .policy(SyncPolicy::Periodic(Duration::from_secs(5)))
        .build()?;

    prefs.put("name", "user-defaults")?;
    prefs.put("window.width", 1280)?;
    prefs.put("window.scale", 1.5)?;
    prefs.synchronize();

    let contents = std::fs::read_to_string(prefs.path())?;
    println!("On-disk JSON:\n{contents}");

    println!("\nDebug output: {prefs:?}");
    drop(prefs);

    // immediate policy: every put rewrites the file
    let immediate_path = dir.join("user_defaults_example_immediate.json");
    let prefs = UserDefaults::<DefaultBackend>::builder(&immediate_path)
        .policy(SyncPolicy::Immediate)
        .build()?;
    prefs.put("launches", 1)?;
    println!("\nImmediate: {}", std::fs::read_to_string(prefs.path())?);

    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(&immediate_path);
    Ok(())
}
