use std::time::Duration;

use serde_json::Value;
use thirtyfour::prelude::*;
use thirtyfour::ChromeCapabilities;

pub struct E2eOptions {
    pub chromedriver_url: String,
    pub demo_url: String,
    pub headless: bool,
}

pub fn run_e2e(opts: E2eOptions) -> Result<(), String> {
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start tokio runtime: {}", e))?;
    runtime.block_on(run_e2e_async(opts))
}

async fn run_e2e_async(opts: E2eOptions) -> Result<(), String> {
    let mut caps = ChromeCapabilities::new();
    caps.add_arg("--no-first-run")
        .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    caps.add_arg("--no-default-browser-check")
        .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    if opts.headless {
        caps.add_arg("--headless=new")
            .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
        caps.add_arg("--disable-gpu")
            .map_err(|e| format!("Failed to set chrome arg: {}", e))?;
    }

    let driver = WebDriver::new(&opts.chromedriver_url, caps)
        .await
        .map_err(|e| format!("Failed to connect to chromedriver: {}", e))?;

    let mut errors = Vec::new();

    if let Err(e) = open_demo(&driver, &opts.demo_url).await {
        errors.push(format!("Demo page check failed: {}", e));
    } else {
        if let Err(e) = check_initial_state(&driver).await {
            errors.push(format!("Initial state check failed: {}", e));
        }
        if let Err(e) = check_flag_toggle(&driver).await {
            errors.push(format!("Flag toggle check failed: {}", e));
        }
        if let Err(e) = check_master_toggle(&driver).await {
            errors.push(format!("Master toggle check failed: {}", e));
        }
    }

    driver.quit().await.ok();

    if errors.is_empty() {
        println!("E2E checks passed");
        Ok(())
    } else {
        Err(format!("E2E failed:\n- {}", errors.join("\n- ")))
    }
}

async fn open_demo(driver: &WebDriver, url: &str) -> Result<(), String> {
    driver.goto(url).await.map_err(|e| format!("Failed to open '{}': {}", url, e))?;
    driver
        .execute("localStorage.clear(); return true;", Vec::<Value>::new())
        .await
        .map_err(|e| format!("Failed to clear storage: {}", e))?;
    driver.refresh().await.map_err(|e| format!("Failed to reload: {}", e))?;

    // The module loads asynchronously; wait for the rendered control.
    for _ in 0..20 {
        if driver.find(By::Css(".dach-switch")).await.is_ok() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    Err("Switch was never rendered".to_string())
}

async fn check_initial_state(driver: &WebDriver) -> Result<(), String> {
    for id in ["de-item", "at-item", "ch-item"] {
        if display_of(driver, id).await? != "" {
            return Err(format!("Expected #{} to be visible", id));
        }
    }
    Ok(())
}

async fn check_flag_toggle(driver: &WebDriver) -> Result<(), String> {
    click(driver, r#"[data-testid="flag-A"]"#).await?;
    if display_of(driver, "at-item").await? != "none" {
        return Err("Expected #at-item to be hidden".to_string());
    }
    if display_of(driver, "de-item").await? != "" {
        return Err("Expected #de-item to stay visible".to_string());
    }
    click(driver, r#"[data-testid="flag-A"]"#).await?;
    if display_of(driver, "at-item").await? != "" {
        return Err("Expected #at-item to be visible again".to_string());
    }
    Ok(())
}

async fn check_master_toggle(driver: &WebDriver) -> Result<(), String> {
    let selector = r#"button[title="Toggle All Countries"]"#;
    click(driver, selector).await?;
    if display_of(driver, "ch-item").await? != "none" {
        return Err("Expected everything hidden after the first press".to_string());
    }
    click(driver, selector).await?;
    if display_of(driver, "ch-item").await? != "" {
        return Err("Expected everything visible after the second press".to_string());
    }
    Ok(())
}

async fn click(driver: &WebDriver, selector: &str) -> Result<(), String> {
    let element = driver
        .find(By::Css(selector))
        .await
        .map_err(|e| format!("Missing '{}': {}", selector, e))?;
    element.click().await.map_err(|e| format!("Failed to click '{}': {}", selector, e))
}

async fn display_of(driver: &WebDriver, id: &str) -> Result<String, String> {
    let script = format!("return document.getElementById('{}')?.style.display ?? null;", id);
    let result = driver
        .execute(&script, Vec::<Value>::new())
        .await
        .map_err(|e| format!("Failed to read #{}: {}", id, e))?;
    result
        .json()
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("No element #{}", id))
}
