//! Runtime chunk-loader shim embedded in fragment-preserving artifacts.
//!
//! The shim is a closure over two frozen tables (chunk id → request path, request path →
//! script text) and a loaded-set. It moves through three states:
//! `idle` → `waiting` (polling for the module loader hook) → `patched`. The poll gives up after
//! a fixed ceiling and patching proceeds with whatever is available, so a missing loader
//! never blocks the page.

use std::collections::BTreeMap;

use crate::models::ChunkTable;

/// Delay between checks for the module loader hook.
pub const CHUNK_POLL_INTERVAL_MS: u64 = 100;
/// Upper bound on the time spent waiting for the module loader hook.
pub const CHUNK_POLL_TIMEOUT_MS: u64 = 5000;

const CHUNK_LOADER_TEMPLATE: &str = r#"
(function () {
  var chunkPaths = Object.freeze(__CHUNK_PATHS__);
  var chunkSources = Object.freeze(__CHUNK_SOURCES__);
  var loadedChunks = new Set();
  var state = 'idle';
  var hasOwn = Object.prototype.hasOwnProperty;

  function sourceForId(chunkId) {
    var key = String(chunkId);
    if (!hasOwn.call(chunkPaths, key)) {
      return null;
    }
    var path = chunkPaths[key];
    return hasOwn.call(chunkSources, path) ? chunkSources[path] : null;
  }

  function sourceForUrl(url) {
    var bare = String(url).split('#')[0].split('?')[0];
    var paths = Object.keys(chunkSources);
    for (var i = 0; i < paths.length; i++) {
      var path = paths[i];
      if (bare === path || bare.slice(-path.length) === path) {
        return chunkSources[path];
      }
    }
    return null;
  }

  function injectChunk(source) {
    var script = document.createElement('script');
    script.textContent = source;
    (document.head || document.documentElement).appendChild(script);
  }

  function waitForLoader() {
    state = 'waiting';
    return new Promise(function (resolve) {
      var started = Date.now();
      (function poll() {
        if (window.__webpack_require__ || Date.now() - started >= __POLL_TIMEOUT__) {
          resolve();
          return;
        }
        setTimeout(poll, __POLL_INTERVAL__);
      })();
    });
  }

  function patchLoader() {
    var loader = window.__webpack_require__;
    if (loader && typeof loader.e === 'function') {
      loader.e = function (chunkId) {
        var key = String(chunkId);
        if (loadedChunks.has(key)) {
          return Promise.resolve();
        }
        var source = sourceForId(key);
        try {
          if (source === null) {
            console.warn('standalone: chunk not embedded, assuming loaded:', key);
          } else {
            injectChunk(source);
          }
          loadedChunks.add(key);
          return Promise.resolve();
        } catch (error) {
          return Promise.reject(error);
        }
      };
    }
    state = 'patched';
  }

  if (typeof window.__webpack_chunk_load__ !== 'function') {
    window.__webpack_chunk_load__ = function () {
      return Promise.resolve();
    };
  }

  if (typeof window.fetch === 'function') {
    var originalFetch = window.fetch;
    window.fetch = function (input) {
      var url = typeof input === 'string' ? input : (input && input.url) || '';
      var source = url ? sourceForUrl(url) : null;
      if (source !== null) {
        if (typeof Response === 'function') {
          return Promise.resolve(new Response(source, {
            status: 200,
            headers: { 'Content-Type': 'application/javascript' }
          }));
        }
        return Promise.resolve({
          ok: true,
          status: 200,
          text: function () { return Promise.resolve(source); },
          json: function () { return Promise.resolve({ code: source }); }
        });
      }
      return originalFetch.apply(this, arguments);
    };
  }

  window.__standaloneChunkLoader = {
    state: function () { return state; },
    loaded: function () { return Array.from(loadedChunks); }
  };

  waitForLoader().then(patchLoader);
})();
"#;

/// Render the shim's JavaScript for `chunks`. The result goes inside a `<script>` element.
pub fn render_chunk_loader(chunks: &ChunkTable) -> String {
  CHUNK_LOADER_TEMPLATE
    .replace("__CHUNK_PATHS__", &script_safe_json(chunks.paths_by_id()))
    .replace("__CHUNK_SOURCES__", &script_safe_json(chunks.sources_by_path()))
    .replace("__POLL_TIMEOUT__", &CHUNK_POLL_TIMEOUT_MS.to_string())
    .replace("__POLL_INTERVAL__", &CHUNK_POLL_INTERVAL_MS.to_string())
}

/// Serialise a string map as a JSON object literal that is safe inside a `<script>` element.
fn script_safe_json(map: &BTreeMap<String, String>) -> String {
  serde_json::to_string(map)
    .unwrap_or_else(|_| "{}".to_string())
    .replace("</", "<\\/")
}
