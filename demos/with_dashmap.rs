use dashmap::DashMap;
use std::thread;
use user_defaults::{SyncPolicy, UserDefaults, Value};

fn main() -> Result<(), user_defaults::Error> {
    let path = std::env::temp_dir().join("user_defaults_example_dashmap.json");

    let prefs = UserDefaults::<DashMap<String, Value>>::builder(&path)
        .policy(SyncPolicy::Manual)
        .build()?;

    thread::scope(|s| {
        for t in 0..4 {
            let prefs = &prefs;
            s.spawn(move || {
                for i in 0..25 {
                    let _ = prefs.put(format!("t{t}.k{i}"), i);
                }
            });
        }
    });
    println!("len = {}", prefs.len());

    prefs.synchronize();
    let _ = std::fs::remove_file(&path);
    Ok(())
}
