use crate::traps;

/// Render the client tracking script served at `/track.js`.
///
/// The script is self-contained and carries the whole client half of the
/// pipeline: session-token bootstrap, device heuristics, the visitor /
/// click / page-view senders, and (when enabled) injection of the hidden
/// trap links wired to the honeypot reporter.
///
/// The session token lives in `sessionStorage`, so it survives navigation
/// within the tab but not a browser restart, and two tabs get two tokens.
pub fn tracking_script(inject_trap_links: bool) -> String {
    // Embed the trap fragment as a JS string literal; JSON encoding handles
    // the quote escaping.
    let trap_html_js = serde_json::to_string(&traps::hidden_links_html())
        .unwrap_or_else(|_| "\"\"".to_string());
    let inject_traps = if inject_trap_links { "true" } else { "false" };

    format!(
        r#"(function () {{
  'use strict';

  function getSessionId() {{
    var sessionId = sessionStorage.getItem('session_id');
    if (!sessionId) {{
      if (window.crypto && crypto.randomUUID) {{
        sessionId = crypto.randomUUID();
      }} else {{
        sessionId = 'xxxxxxxx-xxxx-4xxx-yxxx-xxxxxxxxxxxx'.replace(/[xy]/g, function (c) {{
          var r = (Math.random() * 16) | 0;
          var v = c === 'x' ? r : (r & 0x3) | 0x8;
          return v.toString(16);
        }});
      }}
      sessionStorage.setItem('session_id', sessionId);
    }}
    return sessionId;
  }}

  function getDeviceType() {{
    var ua = navigator.userAgent;
    if (/(tablet|ipad|playbook|silk)|(android(?!.*mobi))/i.test(ua)) return 'tablet';
    if (/Mobile|Android|iP(hone|od)|IEMobile|BlackBerry|Opera M(obi|ini)/.test(ua)) return 'mobile';
    return 'desktop';
  }}

  function getBrowser() {{
    var ua = navigator.userAgent;
    if (ua.indexOf('Firefox') > -1) return 'Firefox';
    if (ua.indexOf('SamsungBrowser') > -1) return 'Samsung Internet';
    if (ua.indexOf('Opera') > -1 || ua.indexOf('OPR') > -1) return 'Opera';
    if (ua.indexOf('Edge') > -1 || ua.indexOf('Edg/') > -1) return 'Edge';
    if (ua.indexOf('Chrome') > -1) return 'Chrome';
    if (ua.indexOf('Safari') > -1) return 'Safari';
    return 'unknown';
  }}

  function getOS() {{
    var ua = navigator.userAgent;
    if (ua.indexOf('Win') > -1) return 'Windows';
    if (ua.indexOf('Mac') > -1) return 'MacOS';
    if (ua.indexOf('Android') > -1) return 'Android';
    if (ua.indexOf('like Mac') > -1 || ua.indexOf('iPhone') > -1) return 'iOS';
    if (ua.indexOf('Linux') > -1) return 'Linux';
    return 'unknown';
  }}

  var BOT_PATTERN = /bot|crawler|spider|crawling|slurp|scraper|wget|python|java|curl|php/i;

  function getBotName() {{
    var ua = navigator.userAgent.toLowerCase();
    if (ua.indexOf('googlebot') > -1) return 'Googlebot';
    if (ua.indexOf('bingbot') > -1) return 'Bingbot';
    if (ua.indexOf('slurp') > -1) return 'Yahoo Slurp';
    if (ua.indexOf('duckduckbot') > -1) return 'DuckDuckBot';
    if (ua.indexOf('baiduspider') > -1) return 'Baidu Spider';
    if (ua.indexOf('yandexbot') > -1) return 'YandexBot';
    if (ua.indexOf('facebookexternalhit') > -1) return 'Facebook Bot';
    if (ua.indexOf('twitterbot') > -1) return 'TwitterBot';
    if (ua.indexOf('linkedinbot') > -1) return 'LinkedIn Bot';
    if (ua.indexOf('gptbot') > -1) return 'GPTBot';
    if (ua.indexOf('claudebot') > -1) return 'ClaudeBot';
    return null;
  }}

  function send(path, data) {{
    var body = JSON.stringify(data);
    if (navigator.sendBeacon) {{
      navigator.sendBeacon(path, new Blob([body], {{ type: 'application/json' }}));
    }} else {{
      fetch(path, {{
        method: 'POST',
        headers: {{ 'Content-Type': 'application/json' }},
        body: body,
        keepalive: true
      }});
    }}
  }}

  var startTime = Date.now();
  var clicksCount = 0;
  var maxScrollDepth = 0;
  var pageViewSent = false;

  function trackVisitor() {{
    send('/api/track/visitor', {{
      sessionId: getSessionId(),
      landingPage: window.location.href,
      referrer: document.referrer,
      deviceType: getDeviceType(),
      browser: getBrowser(),
      os: getOS(),
      screenResolution: window.screen.width + 'x' + window.screen.height,
      language: navigator.language,
      timezone: Intl.DateTimeFormat().resolvedOptions().timeZone,
      isBot: BOT_PATTERN.test(navigator.userAgent),
      botName: getBotName()
    }});
  }}

  function trackPageView() {{
    if (pageViewSent) return;
    pageViewSent = true;
    send('/api/track/pageview', {{
      sessionId: getSessionId(),
      pageUrl: window.location.href,
      pageTitle: document.title,
      timeOnPage: Math.round((Date.now() - startTime) / 1000),
      scrollDepth: maxScrollDepth,
      clicksCount: clicksCount
    }});
  }}

  function trackHoneypot(trapType, trapUrl, method) {{
    send('/api/track/honeypot', {{
      sessionId: getSessionId(),
      trapType: trapType,
      trapUrl: trapUrl,
      method: method || 'GET'
    }});
  }}

  document.addEventListener('click', function (e) {{
    clicksCount++;
    var target = e.target;
    if (!target || !target.tagName) return;

    var trap = target.closest && target.closest('[data-trap]');
    if (trap) {{
      trackHoneypot(trap.getAttribute('data-trap'), trap.getAttribute('href'), 'CLICK');
      return;
    }}

    send('/api/track/click', {{
      sessionId: getSessionId(),
      elementType: target.tagName,
      elementId: target.id || null,
      elementClass: typeof target.className === 'string' ? target.className : null,
      elementText: target.textContent ? target.textContent.substring(0, 100) : null,
      pageUrl: window.location.href,
      x: e.clientX,
      y: e.clientY
    }});
  }});

  window.addEventListener('scroll', function () {{
    var height = document.documentElement.scrollHeight - window.innerHeight;
    if (height <= 0) return;
    var depth = Math.round((window.scrollY / height) * 100);
    if (depth > maxScrollDepth) maxScrollDepth = Math.min(depth, 100);
  }});

  document.addEventListener('visibilitychange', function () {{
    if (document.hidden) {{
      trackPageView();
    }} else {{
      pageViewSent = false;
      startTime = Date.now();
    }}
  }});
  window.addEventListener('pagehide', trackPageView);

  var INJECT_TRAPS = {inject_traps};
  var TRAP_HTML = {trap_html_js};

  function injectTraps() {{
    if (!INJECT_TRAPS || !document.body) return;
    document.body.insertAdjacentHTML('beforeend', TRAP_HTML);
  }}

  if (document.readyState === 'loading') {{
    document.addEventListener('DOMContentLoaded', function () {{
      trackVisitor();
      injectTraps();
    }});
  }} else {{
    trackVisitor();
    injectTraps();
  }}
}})();
"#,
        inject_traps = inject_traps,
        trap_html_js = trap_html_js,
    )
}
